use bytes::Bytes;

/// Computes the etcd range end for a prefix read or watch: the prefix with
/// its last non-0xff byte incremented and the tail truncated. An empty or
/// all-0xff prefix maps to `[0]`, which etcd reads as "to the end of the
/// keyspace".
pub fn prefix_range_end(prefix: &[u8]) -> Bytes {
    for (i, byte) in prefix.iter().enumerate().rev() {
        if *byte < 0xff {
            let mut end = prefix[..=i].to_vec();
            end[i] += 1;
            return Bytes::from(end);
        }
    }
    Bytes::from_static(&[0])
}
