pub mod dispatch;
pub mod publish;
pub mod run;
