pub mod achievement;
pub mod alert;
pub mod answer;
pub mod knowledge;
pub mod metric;
pub mod profile;
pub mod question;
pub mod test_result;
pub mod user;
