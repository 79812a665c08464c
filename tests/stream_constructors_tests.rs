use rs2_seq::stream::VecCursor;
use rs2_seq::{Characteristics, Cursor, IntStream, LongStream, Stream, StreamError, UNKNOWN_SIZE};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_of_and_of_one() {
    assert_eq!(Stream::of(vec!["x", "y"]).to_vec().unwrap(), vec!["x", "y"]);
    assert_eq!(Stream::of_one(42).to_vec().unwrap(), vec![42]);
    assert_eq!(IntStream::of_one(-1).to_vec().unwrap(), vec![-1]);
}

#[test]
fn test_from_iter_is_lazy() {
    let pulled = Rc::new(RefCell::new(Vec::new()));
    let log = pulled.clone();
    let source = (1..).map(move |x: i64| {
        log.borrow_mut().push(x);
        x
    });
    let first_three = Stream::from_iter(source).limit(3).unwrap().to_vec().unwrap();
    assert_eq!(first_three, vec![1, 2, 3]);
    assert_eq!(*pulled.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_from_cursor() {
    let stream = Stream::from_cursor(VecCursor::new(vec![7, 8]));
    let chars = stream.characteristics().unwrap();
    assert!(chars.contains(Characteristics::SIZED));
    let mut stream = stream;
    assert_eq!(stream.to_vec().unwrap(), vec![7, 8]);
}

#[test]
fn test_generate_and_iterate() {
    let ones = Stream::generate(|| 1).limit(4).unwrap().to_vec().unwrap();
    assert_eq!(ones, vec![1, 1, 1, 1]);

    let powers = Stream::iterate(1u64, |x| x * 2).limit(5).unwrap().to_vec().unwrap();
    assert_eq!(powers, vec![1, 2, 4, 8, 16]);

    let strings = Stream::iterate(String::from("a"), |s| format!("{}a", s))
        .skip(2)
        .unwrap()
        .find_first()
        .unwrap();
    assert_eq!(strings.as_deref(), Some("aaa"));

    let halves = rs2_seq::DoubleStream::iterate(8.0, |x| x / 2.0)
        .limit(4)
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(halves, vec![8.0, 4.0, 2.0, 1.0]);
}

#[test]
fn test_concat_preserves_order() {
    let joined = Stream::concat(Stream::of(vec![1, 2]), Stream::of(vec![3]))
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(joined, vec![1, 2, 3]);

    let with_empty = Stream::concat(Stream::empty(), Stream::of(vec![9]))
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(with_empty, vec![9]);

    let both_empty = Stream::<i32>::concat(Stream::empty(), Stream::empty())
        .unwrap()
        .count()
        .unwrap();
    assert_eq!(both_empty, 0);
}

#[test]
fn test_concat_rejects_consumed_input() {
    let mut used = Stream::of(vec![1]);
    used.count().unwrap();
    let err = Stream::concat(used, Stream::of(vec![2])).unwrap_err();
    assert!(err.is_illegal_state());
}

#[test]
fn test_concat_consumes_inputs_and_closes_both() {
    let closed = Rc::new(RefCell::new(Vec::new()));
    let (a_log, b_log) = (closed.clone(), closed.clone());
    let a = Stream::of(vec![1]).on_close(move || {
        a_log.borrow_mut().push("a");
        Ok(())
    });
    let b = Stream::of(vec![2]).on_close(move || {
        b_log.borrow_mut().push("b");
        Ok(())
    });
    let stream = Stream::concat(a.unwrap(), b.unwrap()).unwrap();
    stream.close().unwrap();
    assert_eq!(*closed.borrow(), vec!["a", "b"]);
}

#[test]
fn test_concat_sizes() {
    let sized = Stream::concat(Stream::of(vec![1, 2]), Stream::of(vec![3])).unwrap();
    let mut cursor = sized.map(|x| x).unwrap().into_cursor().unwrap();
    assert_eq!(cursor.estimate_size(), 3);
    assert!(cursor.has_characteristics(Characteristics::SIZED));
    assert_eq!(cursor.try_advance().unwrap(), Some(1));

    let unbounded = Stream::concat(Stream::of(vec![1]), Stream::generate(|| 0)).unwrap();
    let cursor = unbounded.filter(|_| true).unwrap().into_cursor().unwrap();
    assert_eq!(cursor.estimate_size(), UNKNOWN_SIZE);
}

#[test]
fn test_builder_builds_once() {
    let mut builder = Stream::builder();
    builder.add("a").unwrap().add("b").unwrap();
    builder.accept("c").unwrap();
    let mut stream = builder.build().unwrap();
    assert_eq!(stream.to_vec().unwrap(), vec!["a", "b", "c"]);

    assert!(builder.is_built());
    assert!(matches!(builder.accept("d"), Err(StreamError::IllegalState(_))));
    assert!(builder.build().unwrap_err().is_illegal_state());
}

#[test]
fn test_primitive_builder() {
    let mut builder = LongStream::builder();
    builder.add(5).unwrap().add(7).unwrap();
    assert_eq!(builder.build().unwrap().sum().unwrap(), 12);
    assert!(builder.add(1).is_err());
}

#[test]
fn test_range_bounds() {
    assert_eq!(IntStream::range(1, 5).to_vec().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(IntStream::range_closed(1, 5).to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(IntStream::range(5, 5).count().unwrap(), 0);
    assert_eq!(IntStream::range(6, 5).count().unwrap(), 0);
    assert_eq!(IntStream::range_closed(5, 5).to_vec().unwrap(), vec![5]);
    assert_eq!(IntStream::range_closed(6, 5).count().unwrap(), 0);
}

#[test]
fn test_range_at_type_extremes() {
    let top = IntStream::range_closed(i32::MAX - 2, i32::MAX).to_vec().unwrap();
    assert_eq!(top, vec![i32::MAX - 2, i32::MAX - 1, i32::MAX]);

    let bottom = IntStream::range(i32::MIN, i32::MIN + 2).to_vec().unwrap();
    assert_eq!(bottom, vec![i32::MIN, i32::MIN + 1]);

    let full = IntStream::range(i32::MIN, i32::MAX).into_cursor().unwrap();
    assert_eq!(full.estimate_size(), u64::from(u32::MAX));
    assert_eq!(
        LongStream::range_closed(i64::MAX - 1, i64::MAX).to_vec().unwrap(),
        vec![i64::MAX - 1, i64::MAX]
    );
    let whole = LongStream::range_closed(i64::MIN, i64::MAX).into_cursor().unwrap();
    assert_eq!(whole.estimate_size(), u64::MAX);
}

#[test]
fn test_range_characteristics() {
    let range = IntStream::range_closed(1, 10);
    let chars = range.characteristics().unwrap();
    assert!(chars.contains(
        Characteristics::SIZED | Characteristics::SORTED | Characteristics::DISTINCT | Characteristics::ORDERED
    ));
}
