use futures::StreamExt;
use rs2_seq::{
    DoubleSummaryStatistics, IntStream, IntSummaryStatistics, LongStream, Stream, StreamConfig, StreamError,
};

#[test]
fn test_iterator_yields_remaining_elements() {
    let mut stream = Stream::of(vec!["a", "b", "c"]).skip(1).unwrap();
    let iter = stream.iterator().unwrap();
    assert_eq!(iter.size_hint(), (2, Some(2)));
    let items: Result<Vec<_>, StreamError> = iter.collect();
    assert_eq!(items.unwrap(), vec!["b", "c"]);
    assert!(stream.iterator().unwrap_err().is_illegal_state());
}

#[test]
fn test_iterator_over_empty_and_unbounded() {
    let mut empty = IntStream::empty();
    assert_eq!(empty.iterator().unwrap().count(), 0);

    let mut naturals = LongStream::iterate(0, |x| x + 1);
    let iter = naturals.iterator().unwrap();
    assert_eq!(iter.size_hint(), (0, None));
    let firsts: Vec<i64> = iter.take(3).map(Result::unwrap).collect();
    assert_eq!(firsts, vec![0, 1, 2]);
}

#[test]
fn test_into_cursor_hands_over_traversal() {
    use rs2_seq::Cursor;

    let mut stream = Stream::of(vec![1, 2, 3]);
    let mut cursor = stream.into_cursor().unwrap();
    assert_eq!(cursor.try_advance().unwrap(), Some(1));
    let mut rest = Vec::new();
    cursor.for_each_remaining(&mut |x| rest.push(x)).unwrap();
    assert_eq!(rest, vec![2, 3]);
    assert!(cursor.try_split().is_none());

    let mut empty = Stream::<u8>::empty();
    let mut cursor = empty.into_cursor().unwrap();
    assert_eq!(cursor.try_advance().unwrap(), None);
}

#[tokio::test]
async fn test_async_stream_adapter() {
    let mut stream = IntStream::range(0, 5).map(|x| x * x).unwrap();
    let squares: Vec<i32> = stream
        .to_async_stream()
        .unwrap()
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(squares, vec![0, 1, 4, 9, 16]);
}

#[tokio::test]
async fn test_async_stream_surfaces_faults() {
    let mut stream = Stream::of(vec![2.0, f64::NAN]).sorted_partial().unwrap();
    let results: Vec<_> = stream.to_async_stream().unwrap().collect().await;
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(StreamError::Incomparable(_))));
}

#[test]
fn test_statistics_serialize_as_json() {
    let stats = IntStream::of(vec![3, 9]).summary_statistics().unwrap();
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["sum"], 12);
    assert_eq!(json["min"], 3);
    assert_eq!(json["max"], 9);

    let restored: IntSummaryStatistics = serde_json::from_value(json).unwrap();
    assert_eq!(restored, stats);
    assert_eq!(restored.average(), 6.0);
}

#[test]
fn test_double_statistics_survive_json() {
    let stats = rs2_seq::DoubleStream::of(vec![0.1, 0.2, 0.3]).summary_statistics().unwrap();
    let text = serde_json::to_string(&stats).unwrap();
    let restored: DoubleSummaryStatistics = serde_json::from_str(&text).unwrap();
    assert_eq!(restored.count(), 3);
    assert_eq!(restored.sum(), stats.sum());
}

#[test]
fn test_empty_double_statistics_survive_json() {
    let stats = rs2_seq::DoubleStream::empty().summary_statistics().unwrap();
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["count"], 0);
    assert!(json.get("min").is_none());
    assert!(json.get("max").is_none());

    let restored: DoubleSummaryStatistics = serde_json::from_value(json).unwrap();
    assert_eq!(restored, stats);
    assert_eq!(restored.min(), f64::INFINITY);
    assert_eq!(restored.max(), f64::NEG_INFINITY);
    assert_eq!(restored.average(), 0.0);
}

#[test]
fn test_iterator_has_debug_output() {
    let mut stream = IntStream::of(vec![1]);
    let mut iter = stream.iterator().unwrap();
    assert_eq!(format!("{:?}", iter), "CursorIter { exhausted: false }");
    assert_eq!(iter.next().unwrap().unwrap(), 1);
    assert!(iter.next().is_none());
    assert_eq!(format!("{:?}", iter), "CursorIter { exhausted: true }");
}

#[test]
fn test_stream_config_from_json() {
    let config: StreamConfig = serde_json::from_str(r#"{"initial_capacity": 64, "stable_sort": false}"#).unwrap();
    assert_eq!(config, StreamConfig::new().initial_capacity(64).stable_sort(false));
    assert_eq!(StreamConfig::default().initial_capacity, 16);
    assert!(StreamConfig::default().stable_sort);
}
