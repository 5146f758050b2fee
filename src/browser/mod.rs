//! 浏览器模块
//!
//! 负责启动浏览器、导航到目标页面，以及启动前的服务可达性探测

pub mod launch;
pub mod service;

pub use launch::launch_browser;
pub use service::wait_for_service;
