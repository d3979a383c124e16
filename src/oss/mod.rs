//! Object-storage collaborator.
//!
//! The storage provider is an external dependency offering exactly two
//! capabilities this subsystem needs: object existence checks and signed
//! GET URL generation.  [`client::OssClient`] is the seam; `aliyun` talks
//! to the real service and `memory` backs the tests.

pub mod aliyun;
pub mod client;
pub mod memory;

pub use aliyun::AliyunOssClient;
pub use client::OssClient;
pub use memory::MemoryOssClient;
