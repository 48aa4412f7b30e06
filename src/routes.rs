use crate::{
    api::{attendance, employee, kpi, leave, master, payroll, reports, settings, storage},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            // Public routes
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware))
                    // authentication
                    .wrap(Governor::new(&protected_limiter)) // rate limiting
                    .service(
                        web::resource("/users/me").route(web::put().to(handlers::update_profile)),
                    )
                    .service(
                        web::scope("/employees")
                            // /employees
                            .service(
                                web::resource("")
                                    .route(web::get().to(employee::list_employees))
                                    .route(web::post().to(employee::create_employee)),
                            )
                            // /employees/import (before /{id})
                            .service(
                                web::resource("/import")
                                    .route(web::post().to(employee::import_employees)),
                            )
                            // /employees/{id}
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(employee::get_employee))
                                    .route(web::put().to(employee::update_employee))
                                    .route(web::delete().to(employee::delete_employee)),
                            )
                            // /employees/{id}/position-history
                            .service(
                                web::resource("/{id}/position-history")
                                    .route(web::get().to(employee::position_history)),
                            )
                            // /employees/{id}/salary-components
                            .service(
                                web::resource("/{id}/salary-components")
                                    .route(web::get().to(payroll::employee_salary_components))
                                    .route(web::put().to(payroll::replace_salary_components)),
                            ),
                    )
                    .service(
                        web::scope("/leave-requests")
                            // /leave-requests
                            .service(
                                web::resource("")
                                    .route(web::get().to(leave::list_leave_requests))
                                    .route(web::post().to(leave::create_leave_request)),
                            )
                            // /leave-requests/{id}/status
                            .service(
                                web::resource("/{id}/status")
                                    .route(web::put().to(leave::decide_leave_request)),
                            ),
                    )
                    .service(
                        web::scope("/attendance")
                            // /attendance
                            .service(
                                web::resource("")
                                    .route(web::get().to(attendance::list_attendance)),
                            )
                            // /attendance/import
                            .service(
                                web::resource("/import")
                                    .route(web::post().to(attendance::import_attendance)),
                            ),
                    )
                    .service(
                        web::scope("/kpis")
                            // /kpis
                            .service(
                                web::resource("")
                                    .route(web::get().to(kpi::list_kpis))
                                    .route(web::post().to(kpi::create_kpi)),
                            )
                            // /kpis/{id}
                            .service(
                                web::resource("/{id}")
                                    .route(web::put().to(kpi::update_kpi))
                                    .route(web::delete().to(kpi::delete_kpi)),
                            ),
                    )
                    .service(
                        web::scope("/positions")
                            .service(
                                web::resource("")
                                    .route(web::get().to(master::list_positions))
                                    .route(web::post().to(master::create_position)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::put().to(master::update_position))
                                    .route(web::delete().to(master::delete_position)),
                            ),
                    )
                    .service(
                        web::scope("/units")
                            .service(
                                web::resource("")
                                    .route(web::get().to(master::list_units))
                                    .route(web::post().to(master::create_unit)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::put().to(master::update_unit))
                                    .route(web::delete().to(master::delete_unit)),
                            ),
                    )
                    .service(
                        web::scope("/leave-types")
                            .service(
                                web::resource("")
                                    .route(web::get().to(master::list_leave_types))
                                    .route(web::post().to(master::create_leave_type)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::put().to(master::update_leave_type))
                                    .route(web::delete().to(master::delete_leave_type)),
                            ),
                    )
                    .service(
                        web::scope("/partner-banks")
                            .service(
                                web::resource("")
                                    .route(web::get().to(master::list_partner_banks))
                                    .route(web::post().to(master::create_partner_bank)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::put().to(master::update_partner_bank))
                                    .route(web::delete().to(master::delete_partner_bank)),
                            ),
                    )
                    .service(
                        web::resource("/payslips").route(web::get().to(payroll::list_payslips)),
                    )
                    .service(
                        web::scope("/payroll")
                            // /payroll/periods
                            .service(
                                web::resource("/periods")
                                    .route(web::get().to(payroll::payroll_periods)),
                            )
                            // /payroll/generate
                            .service(
                                web::resource("/generate")
                                    .route(web::post().to(payroll::generate_payroll)),
                            ),
                    )
                    .service(
                        web::scope("/payroll-components")
                            .service(
                                web::resource("")
                                    .route(web::get().to(payroll::list_components))
                                    .route(web::post().to(payroll::create_component)),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::put().to(payroll::update_component))
                                    .route(web::delete().to(payroll::delete_component)),
                            ),
                    )
                    .service(
                        web::scope("/settings")
                            .service(
                                web::resource("/database")
                                    .route(web::get().to(settings::get_database_settings))
                                    .route(web::post().to(settings::save_database_settings)),
                            )
                            .service(
                                web::resource("/database/test")
                                    .route(web::post().to(settings::test_database_connection)),
                            )
                            .service(
                                web::resource("/storage")
                                    .route(web::get().to(settings::get_storage_settings))
                                    .route(web::post().to(settings::save_storage_settings)),
                            )
                            .service(
                                web::resource("/storage/test")
                                    .route(web::post().to(settings::test_storage_connection)),
                            )
                            .service(
                                web::resource("/whatsapp")
                                    .route(web::get().to(settings::get_waha_settings))
                                    .route(web::post().to(settings::save_waha_settings)),
                            )
                            .service(
                                web::resource("/whatsapp/test")
                                    .route(web::post().to(settings::test_whatsapp)),
                            ),
                    )
                    .service(
                        web::resource("/database/seed")
                            .route(web::post().to(settings::seed_database)),
                    )
                    .service(
                        web::resource("/storage/generate-upload-url")
                            .route(web::post().to(storage::generate_upload_url)),
                    )
                    .service(
                        web::scope("/reports")
                            .service(
                                web::resource("/employees")
                                    .route(web::get().to(reports::employees_report)),
                            )
                            .service(
                                web::resource("/payroll")
                                    .route(web::get().to(reports::payroll_report)),
                            )
                            .service(
                                web::resource("/bank-transfer")
                                    .route(web::get().to(reports::bank_transfer_report)),
                            )
                            .service(
                                web::resource("/attendance-summary")
                                    .route(web::get().to(reports::attendance_summary_report)),
                            ),
                    ),
            ),
    );
}

// LOGIN
//  └─ access_token (15 min)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//       └─ role decides which routes answer 200 vs 403
