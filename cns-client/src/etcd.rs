use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Status;
use tonic::Streaming;
use tonic::metadata::Ascii;
use tonic::metadata::MetadataValue;
use tonic::service::Interceptor;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tracing::debug;

use cns_proto::etcdserverpb::PutRequest;
use cns_proto::etcdserverpb::RangeRequest;
use cns_proto::etcdserverpb::WatchCreateRequest;
use cns_proto::etcdserverpb::WatchRequest;
use cns_proto::etcdserverpb::WatchResponse;
use cns_proto::etcdserverpb::kv_client::KvClient;
use cns_proto::etcdserverpb::watch_client::WatchClient;
use cns_proto::etcdserverpb::watch_request::RequestUnion;
use cns_proto::mvccpb;
use cns_proto::mvccpb::event::EventType;

use crate::EtcdStoreBuilder;
use crate::EventOp;
use crate::EventStream;
use crate::StoreClient;
use crate::StoreError;
use crate::StoreEvent;
use crate::StoreResult;
use crate::prefix_range_end;

/// Attaches the etcd auth token as `token` metadata on every request.
#[derive(Clone, Default)]
pub(crate) struct AuthToken {
    token: Option<MetadataValue<Ascii>>,
}

impl AuthToken {
    pub(crate) fn set(&mut self, token: &str) -> StoreResult<()> {
        let value = token
            .parse()
            .map_err(|_| StoreError::NotConnected("malformed auth token".into()))?;
        self.token = Some(value);
        Ok(())
    }
}

impl Interceptor for AuthToken {
    fn call(&mut self, mut request: tonic::Request<()>) -> Result<tonic::Request<()>, Status> {
        if let Some(token) = &self.token {
            request.metadata_mut().insert("token", token.clone());
        }
        Ok(request)
    }
}

type Intercepted = InterceptedService<Channel, AuthToken>;

/// gRPC store client against an etcd v3 compatible server.
///
/// Cloning is cheap; clones share the underlying channel.
#[derive(Clone)]
pub struct EtcdStore {
    kv: KvClient<Intercepted>,
    watch: WatchClient<Intercepted>,
    endpoint: String,
}

impl EtcdStore {
    /// Create a configured store builder.
    pub fn builder(host: impl Into<String>, port: u16) -> EtcdStoreBuilder {
        EtcdStoreBuilder::new(host, port)
    }

    pub(crate) fn new(channel: Channel, token: AuthToken, endpoint: String) -> Self {
        Self {
            kv: KvClient::with_interceptor(channel.clone(), token.clone()),
            watch: WatchClient::with_interceptor(channel, token),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl StoreClient for EtcdStore {
    async fn all(&self, prefix: &str) -> StoreResult<BTreeMap<String, String>> {
        let request = RangeRequest {
            key: Bytes::copy_from_slice(prefix.as_bytes()),
            range_end: prefix_range_end(prefix.as_bytes()),
            ..Default::default()
        };

        let response = self
            .kv
            .clone()
            .range(request)
            .await
            .map_err(|s| StoreError::FailedToGetAll(format!("{prefix}: {}", s.message())))?;

        let mut map = BTreeMap::new();
        for kv in response.into_inner().kvs {
            map.insert(
                String::from_utf8_lossy(&kv.key).into_owned(),
                String::from_utf8_lossy(&kv.value).into_owned(),
            );
        }
        Ok(map)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let request = RangeRequest {
            key: Bytes::copy_from_slice(key.as_bytes()),
            ..Default::default()
        };

        let response = self
            .kv
            .clone()
            .range(request)
            .await
            .map_err(|s| StoreError::FailedToGet(format!("{key}: {}", s.message())))?;

        Ok(response
            .into_inner()
            .kvs
            .first()
            .map(|kv| String::from_utf8_lossy(&kv.value).into_owned()))
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let request = PutRequest {
            key: Bytes::copy_from_slice(key.as_bytes()),
            value: Bytes::copy_from_slice(value.as_bytes()),
            ..Default::default()
        };

        self.kv
            .clone()
            .put(request)
            .await
            .map_err(|s| StoreError::FailedToPut(format!("{key}: {}", s.message())))?;
        Ok(())
    }

    async fn watch(&self, prefix: &str) -> StoreResult<EventStream> {
        let (tx, rx) = mpsc::channel::<WatchRequest>(4);

        let create = WatchRequest {
            request_union: Some(RequestUnion::CreateRequest(WatchCreateRequest {
                key: Bytes::copy_from_slice(prefix.as_bytes()),
                range_end: prefix_range_end(prefix.as_bytes()),
                ..Default::default()
            })),
        };
        tx.send(create)
            .await
            .map_err(|e| StoreError::FailedToWatch(format!("{prefix}: {e}")))?;

        let inbound = self
            .watch
            .clone()
            .watch(ReceiverStream::new(rx))
            .await
            .map_err(|s| StoreError::FailedToWatch(format!("{prefix}: {}", s.message())))?
            .into_inner();

        debug!(prefix, "watch stream established");

        Ok(Box::pin(WatchEvents {
            _tx: tx,
            inbound,
            pending: VecDeque::new(),
        }))
    }

    async fn close(&self) -> StoreResult<()> {
        // Channels close when the last clone drops; nothing to flush.
        debug!(endpoint = %self.endpoint, "store client closed");
        Ok(())
    }
}

/// Flattens the batched watch responses into single [`StoreEvent`]s.
///
/// Holds the request sender for the stream's lifetime: dropping it would make
/// the server cancel the bidirectional watch.
struct WatchEvents {
    _tx: mpsc::Sender<WatchRequest>,
    inbound: Streaming<WatchResponse>,
    pending: VecDeque<StoreEvent>,
}

impl Stream for WatchEvents {
    type Item = StoreResult<StoreEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            match Pin::new(&mut this.inbound).poll_next(cx) {
                Poll::Ready(Some(Ok(response))) => {
                    if response.canceled {
                        return Poll::Ready(Some(Err(StoreError::FailedToWatch(
                            response.cancel_reason,
                        ))));
                    }
                    this.pending
                        .extend(response.events.into_iter().filter_map(event_from_proto));
                    // Created/progress notifications carry no events; poll again.
                }
                Poll::Ready(Some(Err(status))) => {
                    return Poll::Ready(Some(Err(StoreError::FailedToWatch(
                        status.message().to_string(),
                    ))));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

pub(crate) fn event_from_proto(event: mvccpb::Event) -> Option<StoreEvent> {
    let op = match EventType::try_from(event.r#type).unwrap_or(EventType::Put) {
        EventType::Put => EventOp::Put,
        EventType::Delete => EventOp::Delete,
    };
    let kv = event.kv?;
    Some(StoreEvent {
        op,
        key: String::from_utf8_lossy(&kv.key).into_owned(),
        value: String::from_utf8_lossy(&kv.value).into_owned(),
        version: kv.version,
    })
}
