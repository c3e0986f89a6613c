use bytes::Bytes;
use chrono::Utc;
use chrono_tz::Tz;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::{Body, Incoming},
    header::{HeaderValue, CONTENT_TYPE},
    service::Service,
    Method, Request, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};

use std::{error::Error, future::Future, pin::Pin, sync::Arc};

use crate::{
    config::Config,
    error::{AppError, Result},
    places::{status_for, OpeningHoursSource, Place},
    timing::{evaluator::HoursEvaluator, status::RealTimeStatus},
};

use super::response::{OpenNowRequest, OpenNowResponse, OpenPlace, StatusRequest};

/// hyper service answering open-now queries for place records.
#[derive(Clone)]
pub struct Server {
    evaluator: Arc<HoursEvaluator>,
    default_tz: Tz,
    max_body_bytes: usize,
}

impl Server {
    pub fn setup(config: &Config) -> Result<Self> {
        Ok(Self::new(config.default_tz()?, config.max_body_bytes))
    }

    pub fn new(default_tz: Tz, max_body_bytes: usize) -> Self {
        Self {
            evaluator: Arc::new(HoursEvaluator::new()),
            default_tz,
            max_body_bytes,
        }
    }

    /// Routes a request to its handler and turns every failure into a JSON error response.
    pub async fn route<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        tracing::info!(%method, %path, "Request");

        let result = match (&method, path.as_str()) {
            (&Method::POST, "/api/status") => match self.read_json(req).await {
                Ok(body) => Self::ok_data(&self.status(body)),
                Err(err) => Err(err),
            },
            (&Method::POST, "/api/open-now") => match self.read_json(req).await {
                Ok(body) => Self::ok_data(&self.open_now(body)),
                Err(err) => Err(err),
            },
            _ => return Self::not_found(),
        };

        match result {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!(%method, %path, error = %err, "Request rejected");
                Self::error_response(&err)
            }
        }
    }

    /// The /api/status API endpoint. Evaluates a single place.
    pub fn status(&self, req: StatusRequest) -> RealTimeStatus {
        let now = req.now.unwrap_or_else(Utc::now);
        status_for(&req.place, &self.evaluator, now, self.default_tz)
    }

    /// The /api/open-now API endpoint.
    ///
    /// Keeps only the places that are open at `now`. Records that are not a place at
    /// all are counted as skipped; they never fail the whole batch.
    pub fn open_now(&self, req: OpenNowRequest) -> OpenNowResponse {
        let now = req.now.unwrap_or_else(Utc::now);
        let mut skipped = 0;
        let mut open = Vec::new();
        let evaluated = req.places.len();

        for (index, value) in req.places.into_iter().enumerate() {
            let place: Place = match serde_json::from_value(value) {
                Ok(place) => place,
                Err(err) => {
                    tracing::warn!(index, error = %err, "Skipping malformed place");
                    skipped += 1;
                    continue;
                }
            };
            let status = status_for(&place, &self.evaluator, now, self.default_tz);
            tracing::debug!(index, is_open = status.is_open, message = %status.message);
            if status.is_open {
                open.push(OpenPlace {
                    index,
                    name: place.display_name(),
                    status,
                });
            }
        }

        tracing::info!(evaluated, skipped, open = open.len(), "Filtered places");
        OpenNowResponse {
            evaluated,
            skipped,
            open,
        }
    }

    async fn read_json<T, B>(&self, req: Request<B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn Error + Send + Sync>>,
    {
        let body = Limited::new(req.into_body(), self.max_body_bytes);
        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                return Err(AppError::PayloadTooLarge {
                    limit: self.max_body_bytes,
                })
            }
            Err(err) => return Err(AppError::bad_request(err.to_string())),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
        let mut res = Response::new(Full::new(Bytes::from(body)));
        *res.status_mut() = status;
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res
    }

    /// Return a 200 OK response with the data provided.
    fn ok_data<T: Serialize>(body: &T) -> Result<Response<Full<Bytes>>> {
        let data = serde_json::to_string(body)?;
        Ok(Self::json_response(StatusCode::OK, data))
    }

    /// Return the status matching `err` with the error message as the body.
    fn error_response(err: &AppError) -> Response<Full<Bytes>> {
        let body = serde_json::json!({ "error": err.to_string() }).to_string();
        Self::json_response(err.status_code(), body)
    }

    /// Return an empty 404 Not Found response.
    fn not_found() -> Response<Full<Bytes>> {
        let mut res = Response::new(Full::new(Bytes::new()));
        *res.status_mut() = StatusCode::NOT_FOUND;
        res
    }
}

impl Service<Request<Incoming>> for Server {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let server = self.clone();
        Box::pin(async move { Ok(server.route(req).await) })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn server() -> Server {
        Server::new(Tz::UTC, 1024)
    }

    fn post(path: &str, body: serde_json::Value) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_json(res: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_endpoint_evaluates_one_place() {
        let res = server()
            .route(post(
                "/api/status",
                json!({
                    "now": "2024-06-08T01:30:00Z",
                    "place": {
                        "regularOpeningHours": { "weekdayDescriptions": ["Friday: 5:00 PM – 2:00 AM"] },
                        "utcOffsetMinutes": 0
                    }
                }),
            ))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["isOpen"], true);
        assert_eq!(json["message"], "Open until 2:00 AM (Friday's overnight hours)");
    }

    #[tokio::test]
    async fn open_now_filters_and_skips_bad_records() {
        let res = server()
            .route(post(
                "/api/open-now",
                json!({
                    "now": "2024-06-03T10:00:00Z",
                    "places": [
                        { "displayName": { "text": "Cafe" },
                          "regularOpeningHours": { "weekdayDescriptions": ["Monday: 9:00 AM – 5:00 PM"] } },
                        { "name": "Bar",
                          "opening_hours": { "weekday_text": ["Monday: 6:00 PM – 2:00 AM"] } },
                        "not a place",
                        { "name": "Mystery", "opening_hours": { "open_now": true, "weekday_text": ["Monday: Sometimes"] } }
                    ]
                }),
            ))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["evaluated"], 4);
        assert_eq!(json["skipped"], 1);
        let names: Vec<&str> = json["open"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Cafe", "Mystery"]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/status")
            .body(Full::new(Bytes::from_static(b"{ nope")))
            .unwrap();
        let res = server().route(req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let places: Vec<_> = (0..100).map(|_| json!({ "name": "x" })).collect();
        let res = server()
            .route(post("/api/open-now", json!({ "places": places })))
            .await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/api/status")
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert_eq!(server().route(req).await.status(), StatusCode::NOT_FOUND);
    }
}
