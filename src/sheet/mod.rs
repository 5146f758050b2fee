//! 表格读写模块
//!
//! 负责输入表格的读取、链接分组映射和状态列写回

pub mod link_map;
pub mod reader;
pub mod writer;

pub use link_map::LinkMap;
pub use reader::Row;
