//! Store client adapter for the CNS orchestrator.
//!
//! Provides the contract the reconciliation engine consumes and its gRPC
//! implementation against an etcd v3 compatible store:
//! - [`StoreClient`] - prefix-get, single-key get/put, prefix watch, close
//! - [`EtcdStore`] - gRPC implementation over `cns-proto`
//! - [`EtcdStoreBuilder`] - host/port/credential configuration
//! - [`StoreEvent`] / [`EventStream`] - the watch event surface
//!
//! # Basic Usage
//! ```no_run
//! use cns_client::{EtcdStore, StoreClient};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store = EtcdStore::builder("127.0.0.1", 2379)
//!         .connect()
//!         .await
//!         .unwrap();
//!
//!     store.put("cns/demo/name", "demo").await.unwrap();
//!     let snapshot = store.all("cns").await.unwrap();
//!     println!("{} keys under cns", snapshot.len());
//! }
//! ```

mod builder;
mod error;
mod etcd;
mod store;
mod utils;

pub use builder::*;
pub use error::*;
pub use etcd::*;
pub use store::*;
pub use utils::*;
