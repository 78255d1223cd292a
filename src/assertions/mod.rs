pub mod polling;
pub mod login_form;
