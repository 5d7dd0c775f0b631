//! # cns-proto
//!
//! gRPC protocol definitions for the CNS orchestrator's store transport.
//!
//! This crate carries the subset of the etcd v3 API the orchestrator speaks:
//! `KV.Range`/`KV.Put`, the bidirectional `Watch` stream and
//! `Auth.Authenticate`. Message field numbers are wire-compatible with etcd
//! v3, so the generated clients work against a stock etcd server.
//!
//! Rust users should depend on `cns-client` instead; it wraps these raw
//! clients in the `StoreClient` adapter the engine consumes.

pub mod mvccpb {
    tonic::include_proto!("mvccpb");
}

pub mod etcdserverpb {
    tonic::include_proto!("etcdserverpb");
}
