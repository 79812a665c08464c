use rs2_seq::{DoubleStream, IntStream, LongStream, Stream};

#[test]
fn test_range_closed_sum_and_average() {
    assert_eq!(IntStream::range_closed(1, 5).sum().unwrap(), 15);
    assert_eq!(IntStream::range_closed(1, 5).average().unwrap(), Some(3.0));
}

#[test]
fn test_empty_numeric_terminals() {
    assert_eq!(IntStream::empty().sum().unwrap(), 0);
    assert_eq!(IntStream::empty().average().unwrap(), None);
    assert_eq!(LongStream::empty().min().unwrap(), None);
    assert_eq!(DoubleStream::empty().max().unwrap(), None);
    assert_eq!(DoubleStream::empty().sum().unwrap(), 0.0);

    let stats = IntStream::empty().summary_statistics().unwrap();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.min(), i32::MAX);
    assert_eq!(stats.max(), i32::MIN);
    assert_eq!(stats.average(), 0.0);
}

#[test]
fn test_int_sum_wraps_but_statistics_do_not() {
    let wrapped = IntStream::of(vec![i32::MAX, 1]).sum().unwrap();
    assert_eq!(wrapped, i32::MIN);

    let stats = IntStream::of(vec![i32::MAX, 1]).summary_statistics().unwrap();
    assert_eq!(stats.sum(), i64::from(i32::MAX) + 1);
}

#[test]
fn test_summary_statistics() {
    let stats = LongStream::of(vec![4, -2, 10]).summary_statistics().unwrap();
    assert_eq!(stats.count(), 3);
    assert_eq!(stats.sum(), 12);
    assert_eq!(stats.min(), -2);
    assert_eq!(stats.max(), 10);
    assert_eq!(stats.average(), 4.0);
}

#[test]
fn test_double_sum_is_compensated() {
    let mut values = vec![1.0e16];
    values.extend(std::iter::repeat(1.0).take(100));
    values.push(-1.0e16);
    let sum = DoubleStream::of(values).sum().unwrap();
    assert_eq!(sum, 100.0);
}

#[test]
fn test_double_min_max_follow_ieee() {
    assert!(DoubleStream::of(vec![1.0, f64::NAN, -3.0]).min().unwrap().unwrap().is_nan());
    assert!(DoubleStream::of(vec![1.0, f64::NAN]).max().unwrap().unwrap().is_nan());

    let min = DoubleStream::of(vec![0.0, -0.0]).min().unwrap().unwrap();
    assert!(min == 0.0 && min.is_sign_negative());
    let max = DoubleStream::of(vec![-0.0, 0.0]).max().unwrap().unwrap();
    assert!(max == 0.0 && max.is_sign_positive());
}

#[test]
fn test_double_distinct_and_sorted() {
    let distinct = DoubleStream::of(vec![f64::NAN, 1.0, f64::NAN, 0.0, -0.0, 1.0])
        .distinct()
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(distinct.len(), 4);
    assert!(distinct[0].is_nan());
    assert_eq!(distinct[1], 1.0);
    assert!(distinct[3].is_sign_negative());

    let sorted = DoubleStream::of(vec![2.0, f64::NAN, -1.0, 0.0, -0.0])
        .sorted()
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(sorted[0], -1.0);
    assert!(sorted[1].is_sign_negative() && sorted[1] == 0.0);
    assert!(sorted[2].is_sign_positive() && sorted[2] == 0.0);
    assert_eq!(sorted[3], 2.0);
    assert!(sorted[4].is_nan());
}

#[test]
fn test_int_operations() {
    let evens = IntStream::range(0, 10)
        .filter(|x| x % 2 == 0)
        .unwrap()
        .map(|x| x * x)
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(evens, vec![0, 4, 16, 36, 64]);

    let sorted = IntStream::of(vec![3, 1, 3, 2]).distinct().unwrap().sorted().unwrap().to_vec().unwrap();
    assert_eq!(sorted, vec![1, 2, 3]);

    assert_eq!(IntStream::of(vec![5, 1, 9]).min().unwrap(), Some(1));
    assert_eq!(IntStream::of(vec![5, 1, 9]).max().unwrap(), Some(9));
    assert_eq!(IntStream::of(vec![5, 1, 9]).reduce(|a, b| a * b).unwrap(), Some(45));
    assert_eq!(IntStream::empty().reduce_with(1, |a, b| a * b).unwrap(), 1);
    assert_eq!(IntStream::range(0, 100).skip(90).unwrap().limit(3).unwrap().to_vec().unwrap(), vec![90, 91, 92]);
}

#[test]
fn test_matching_and_finding() {
    assert!(IntStream::range(0, 10).any_match(|x| x == 7).unwrap());
    assert!(IntStream::range(0, 10).all_match(|x| x < 10).unwrap());
    assert!(IntStream::range(0, 10).none_match(|x| x < 0).unwrap());
    assert_eq!(IntStream::range(3, 10).find_first().unwrap(), Some(3));
    assert_eq!(IntStream::range(3, 10).find_any().unwrap(), Some(3));

    let mut n = 0;
    let found = LongStream::generate(move || {
        n += 1;
        n
    })
    .any_match(|x| x == 1_000)
    .unwrap();
    assert!(found);
}

#[test]
fn test_cross_engine_bridges() {
    let boxed: Vec<i32> = IntStream::range(1, 4).boxed().unwrap().to_vec().unwrap();
    assert_eq!(boxed, vec![1, 2, 3]);

    let labels = IntStream::range(1, 3)
        .map_to_obj(|x| format!("#{}", x))
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(labels, vec!["#1", "#2"]);

    let widened = IntStream::of(vec![i32::MAX]).as_long_stream().unwrap().map(|x| x + 1).unwrap().to_vec().unwrap();
    assert_eq!(widened, vec![i64::from(i32::MAX) + 1]);

    let halves = LongStream::of(vec![1, 3]).as_double_stream().unwrap().map(|x| x / 2.0).unwrap().to_vec().unwrap();
    assert_eq!(halves, vec![0.5, 1.5]);

    assert_eq!(IntStream::of(vec![1, 2]).as_double_stream().unwrap().sum().unwrap(), 3.0);

    let truncated = DoubleStream::of(vec![1.9, -1.9]).map_to_int(|x| x as i32).unwrap().to_vec().unwrap();
    assert_eq!(truncated, vec![1, -1]);

    let longs = DoubleStream::of(vec![2.0]).map_to_long(|x| x as i64).unwrap().to_vec().unwrap();
    assert_eq!(longs, vec![2]);
}

#[test]
fn test_flat_map_and_collect_with() {
    let expanded = IntStream::range(1, 4)
        .flat_map(|n| IntStream::range(0, n))
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(expanded, vec![0, 0, 1, 0, 1, 2]);

    let collected = LongStream::of(vec![3, 4])
        .collect_with(Vec::new, |v, x| v.push(x * 10), |mut a, b| {
            a.extend(b);
            a
        })
        .unwrap();
    assert_eq!(collected, vec![30, 40]);
}

#[test]
fn test_peek_and_for_each() {
    let mut peeked = Vec::new();
    let mut seen = Vec::new();
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = log.clone();
    IntStream::of(vec![1, 2, 3])
        .peek(move |x| sink.borrow_mut().push(x))
        .unwrap()
        .for_each(|x| seen.push(x))
        .unwrap();
    peeked.extend(log.borrow().iter().copied());
    assert_eq!(peeked, vec![1, 2, 3]);
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn test_primitive_reuse_is_rejected() {
    let mut stream = DoubleStream::of(vec![1.0]);
    assert_eq!(stream.count().unwrap(), 1);
    assert!(stream.sum().unwrap_err().is_illegal_state());
    assert!(stream.summary_statistics().unwrap_err().is_illegal_state());

    let mut empty = IntStream::empty();
    assert_eq!(empty.max().unwrap(), None);
    assert!(empty.max().unwrap_err().is_illegal_state());
}

#[test]
fn test_boxed_shares_lifecycle() {
    let mut boxed = IntStream::of(vec![1, 2]).boxed().unwrap();
    assert_eq!(boxed.count().unwrap(), 2);
    assert!(boxed.count().unwrap_err().is_illegal_state());

    let via_object = Stream::of(vec![2, 3]).map_to_long(|x: i32| i64::from(x)).unwrap().sum().unwrap();
    assert_eq!(via_object, 5);
}

#[test]
fn test_sorted_matches_std_sort_on_random_input() {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let values: Vec<i64> = (0..500).map(|_| rng.gen_range(-1_000..1_000)).collect();
    let mut expected = values.clone();
    expected.sort();

    let sorted = LongStream::of(values.clone()).sorted().unwrap().to_vec().unwrap();
    assert_eq!(sorted, expected);

    expected.dedup();
    let unique = LongStream::of(values).distinct().unwrap().sorted().unwrap().to_vec().unwrap();
    assert_eq!(unique, expected);
}
