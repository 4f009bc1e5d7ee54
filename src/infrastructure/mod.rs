//! 基础设施层
//!
//! 只暴露能力（列举、存在性检查、写入、生成），不关心流程。
//! 具体实现位于 `clients/`，测试中可替换为内存实现。

pub mod generator;
pub mod memory_store;
pub mod object_store;

pub use generator::Generator;
pub use memory_store::InMemoryObjectStore;
pub use object_store::ObjectStore;
