use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use racing_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use racing_backend::routes;
use racing_backend::state::app_state::AppState;

/// Builder for test service instances wired like `main.rs` (minus CORS).
pub struct TestAppBuilder {
    state: AppState,
}

impl TestAppBuilder {
    pub async fn build(self) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
        test::init_service(
            App::new()
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .wrap(StructuredLogger)
                .app_data(web::Data::new(self.state))
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder { state }
}
