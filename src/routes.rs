use crate::{
    api::{attendance, payroll},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("per_millisecond and burst_size are non-zero");
        Governor::new(&cfg)
    }

    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));
    let payroll_limiter = Arc::new(build_limiter(config.rate_payroll_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/payroll")
                    // /payroll?employee_id=&month=&year=
                    .service(web::resource("").route(web::get().to(payroll::get_payrolls)))
                    // /payroll/generate
                    .service(
                        web::resource("/generate")
                            .wrap(payroll_limiter.clone())
                            .route(web::post().to(payroll::generate_payroll)),
                    )
                    // /payroll/recalculate
                    .service(
                        web::resource("/recalculate")
                            .wrap(payroll_limiter)
                            .route(web::put().to(payroll::recalculate_payroll)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/reconciled
                    .service(
                        web::resource("/reconciled")
                            .route(web::get().to(attendance::reconciled_attendance)),
                    ),
            ),
    );
}
