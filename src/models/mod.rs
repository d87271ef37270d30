pub mod alert_view;
pub mod raw_alert;
