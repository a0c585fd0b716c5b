mod availability_test;
mod dashboard_test;
mod middleware_test;
mod reservation_test;
