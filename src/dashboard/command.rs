pub mod staff_dashboard_cmd;
