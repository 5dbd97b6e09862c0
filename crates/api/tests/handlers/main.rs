mod auth_test;
mod contact_test;
mod content_test;
mod middleware_test;
mod schedule_test;
mod test_utils;
