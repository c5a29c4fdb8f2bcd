mod announcements_test;
mod auth_test;
mod client_test;
mod courses_test;
mod exams_test;
mod health_test;
mod monitoring_test;
mod students_test;
