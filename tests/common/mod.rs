#![allow(dead_code)]

use alphaess::error::{AlphaEssError, Result};
use alphaess::transport::{ApiRequest, HttpTransport, RawResponse};
use alphaess::{AlphaEssClient, Credentials};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Canned answer for one route
#[derive(Clone)]
pub enum Reply {
    Status(u16, Value),
    Raw(u16, &'static str),
    ConnectionError,
    Hang,
}

impl Reply {
    pub fn success(data: Value) -> Self {
        Reply::Status(200, json!({"code": 200, "msg": "Success", "data": data}))
    }

    pub fn envelope(body: Value) -> Self {
        Reply::Status(200, body)
    }
}

/// In-memory transport keyed by request path, optionally narrowed by `sysSn`.
/// Every request is recorded, including ones that fail.
pub struct FakeTransport {
    routes: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
    closed: Arc<Mutex<bool>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn route(mut self, path: &str, reply: Reply) -> Self {
        self.routes.insert(path.to_string(), reply);
        self
    }

    pub fn route_for(mut self, path: &str, sys_sn: &str, reply: Reply) -> Self {
        self.routes.insert(format!("{}#{}", path, sys_sn), reply);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<ApiRequest>>> {
        self.calls.clone()
    }

    pub fn closed_flag(&self) -> Arc<Mutex<bool>> {
        self.closed.clone()
    }

    fn lookup(&self, request: &ApiRequest) -> Reply {
        let sys_sn = request
            .query
            .iter()
            .find(|(k, _)| k == "sysSn")
            .map(|(_, v)| v.clone());
        if let Some(sn) = sys_sn
            && let Some(reply) = self.routes.get(&format!("{}#{}", request.path, sn))
        {
            return reply.clone();
        }
        self.routes
            .get(&request.path)
            .cloned()
            .unwrap_or(Reply::Raw(404, "not found"))
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(request.clone());
        match self.lookup(request) {
            Reply::Status(status, body) => Ok(RawResponse {
                status,
                body: serde_json::to_vec(&body).unwrap(),
            }),
            Reply::Raw(status, body) => Ok(RawResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            Reply::ConnectionError => Err(AlphaEssError::network("connection refused")),
            Reply::Hang => std::future::pending().await,
        }
    }

    fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }

    fn owns_session(&self) -> bool {
        true
    }
}

pub fn client_with(transport: FakeTransport) -> AlphaEssClient {
    AlphaEssClient::with_transport(
        Credentials::new("alpha61a0e1b8e2f3c4d5", "0123456789abcdef"),
        Box::new(transport),
    )
}

/// A transport answering every read endpoint for the given serials
pub fn healthy_transport(serials: &[&str]) -> FakeTransport {
    let list: Vec<Value> = serials
        .iter()
        .map(|sn| json!({"sysSn": sn, "popv": 5.4, "cobat": 10.1}))
        .collect();
    FakeTransport::new()
        .route("/getEssList", Reply::success(Value::Array(list)))
        .route("/getSumDataForCustomer", Reply::success(json!({"epvtotal": 1520.3})))
        .route("/getOneDateEnergyBySn", Reply::success(json!({"epv": 12.4})))
        .route("/getLastPowerData", Reply::success(json!({"soc": 64.0, "pbat": -1200})))
        .route("/getChargeConfigInfo", Reply::success(json!({"gridCharge": 0, "batHighCap": 100})))
        .route("/getDisChargeConfigInfo", Reply::success(json!({"ctrDis": 0, "batUseCap": 10})))
        .route("/getOneDayPowerBySn", Reply::success(json!([{"cbat": 55.0}])))
}

pub fn paths_of(calls: &Arc<Mutex<Vec<ApiRequest>>>) -> Vec<String> {
    calls.lock().unwrap().iter().map(|c| c.path.clone()).collect()
}

pub fn query_value(request: &ApiRequest, key: &str) -> Option<String> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}
