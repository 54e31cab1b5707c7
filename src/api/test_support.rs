use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web::Data};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::auth::jwt::tests::token;
use crate::config::Config;
use crate::model::role::Role;
use crate::models::TokenType;
use crate::routes;
use crate::store::{PayrollStore, memory::MemoryStore};

pub(crate) use crate::payroll::service::tests::seeded_store;

/// Routes wired to a shared in-memory store, the same way `main` wires them.
pub(crate) struct TestApp {
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    async fn send(&self, req: test::TestRequest) -> (StatusCode, Value) {
        let config = Config::for_tests();
        let store: Arc<dyn PayrollStore> = self.store.clone();
        let app = test::init_service(
            App::new()
                .app_data(Data::from(store))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, config.clone())),
        )
        .await;

        let req = req
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;

        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn bearer(role: Role, employee_id: Option<u64>) -> (&'static str, String) {
        (
            "Authorization",
            format!("Bearer {}", token(role as u8, employee_id, TokenType::Access)),
        )
    }

    pub async fn get(&self, uri: &str, role: Role, employee_id: Option<u64>) -> (StatusCode, Value) {
        self.send(
            test::TestRequest::get()
                .uri(uri)
                .insert_header(Self::bearer(role, employee_id)),
        )
        .await
    }

    pub async fn get_anonymous(&self, uri: &str) -> (StatusCode, Value) {
        self.send(test::TestRequest::get().uri(uri)).await
    }

    pub async fn get_with_authorization(&self, uri: &str, header: &str) -> (StatusCode, Value) {
        self.send(
            test::TestRequest::get()
                .uri(uri)
                .insert_header(("Authorization", header.to_string())),
        )
        .await
    }

    pub async fn post(
        &self,
        uri: &str,
        role: Role,
        employee_id: Option<u64>,
        body: &Value,
    ) -> (StatusCode, Value) {
        self.send(
            test::TestRequest::post()
                .uri(uri)
                .insert_header(Self::bearer(role, employee_id))
                .set_json(body),
        )
        .await
    }

    pub async fn put(&self, uri: &str, role: Role, body: &Value) -> (StatusCode, Value) {
        self.send(
            test::TestRequest::put()
                .uri(uri)
                .insert_header(Self::bearer(role, None))
                .set_json(body),
        )
        .await
    }
}

/// Monetary fields travel as JSON strings.
pub(crate) fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| panic!("not a decimal string: {value}"))
}
