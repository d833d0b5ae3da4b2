pub mod login_cmd;
pub mod logout_cmd;
pub mod signup_cmd;
