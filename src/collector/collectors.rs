//! The standard collector library.
//!
//! Every function returns a fresh `Collector`; composing ones
//! (`grouping_by_with`, `partitioning_by_with`, `mapping`,
//! `collecting_and_then`) wrap a downstream collector and share its functions.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::rc::Rc;

use indexmap::IndexMap;

use super::joiner::StringJoiner;
use super::keyed::KeyedCollection;
use super::{Collector, CollectorCharacteristics};
use crate::error::{StreamError, StreamResult};
use crate::statistics::{
    DoubleSummaryStatistics, IntSummaryStatistics, LongSummaryStatistics, SummaryStatistics,
};
use crate::stream::Primitive;

// ================================
// Collections
// ================================

/// All elements, in encounter order
pub fn to_list<T: 'static>() -> Collector<T, Vec<T>, Vec<T>> {
    Collector::of(
        Vec::new,
        |list: &mut Vec<T>, item: T| list.push(item),
        |mut left: Vec<T>, mut right: Vec<T>| {
            left.append(&mut right);
            left
        },
        CollectorCharacteristics::empty(),
    )
}

pub fn to_set<T>() -> Collector<T, HashSet<T>, HashSet<T>>
where
    T: Hash + Eq + 'static,
{
    Collector::of(
        HashSet::new,
        |set: &mut HashSet<T>, item: T| {
            set.insert(item);
        },
        |left: HashSet<T>, right: HashSet<T>| {
            let (mut big, small) = if left.len() >= right.len() { (left, right) } else { (right, left) };
            big.extend(small);
            big
        },
        CollectorCharacteristics::UNORDERED,
    )
}

/// All elements, added to a collection from `factory`
pub fn to_collection<T, C, F>(factory: F) -> Collector<T, C, C>
where
    T: 'static,
    C: Extend<T> + IntoIterator<Item = T> + 'static,
    F: Fn() -> C + 'static,
{
    Collector::of(
        factory,
        |collection: &mut C, item: T| collection.extend(Some(item)),
        |mut left: C, right: C| {
            left.extend(right);
            left
        },
        CollectorCharacteristics::empty(),
    )
}

// ================================
// Strings
// ================================

/// Concatenate string elements in encounter order
pub fn joining<T>() -> Collector<T, StringJoiner, String>
where
    T: AsRef<str> + 'static,
{
    joining_with_affixes("", "", "")
}

pub fn joining_with<T>(delimiter: &str) -> Collector<T, StringJoiner, String>
where
    T: AsRef<str> + 'static,
{
    joining_with_affixes(delimiter, "", "")
}

/// `prefix`, the elements separated by `delimiter`, then `suffix`. An empty
/// input yields `prefix + suffix`.
pub fn joining_with_affixes<T>(delimiter: &str, prefix: &str, suffix: &str) -> Collector<T, StringJoiner, String>
where
    T: AsRef<str> + 'static,
{
    let (delimiter, prefix, suffix) = (delimiter.to_string(), prefix.to_string(), suffix.to_string());
    Collector::of_with_finisher(
        move || StringJoiner::with_affixes(&delimiter, &prefix, &suffix),
        |joiner: &mut StringJoiner, item: T| {
            joiner.add(item.as_ref());
        },
        |mut left: StringJoiner, right: StringJoiner| {
            left.merge(&right);
            left
        },
        |joiner: StringJoiner| joiner.to_string(),
        CollectorCharacteristics::empty(),
    )
}

// ================================
// Maps
// ================================

type MergeFn<K, V> = Rc<dyn Fn(&K, V, V) -> StreamResult<V>>;

fn duplicate_key<K: fmt::Debug + 'static, V: 'static>() -> MergeFn<K, V> {
    Rc::new(|key: &K, _: V, _: V| Err(StreamError::DuplicateKey(format!("{:?}", key))))
}

fn keyed<T, K, V, M, KF, VF, F>(key_mapper: KF, value_mapper: VF, merge: MergeFn<K, V>, factory: F) -> Collector<T, M, M>
where
    T: 'static,
    K: 'static,
    V: 'static,
    M: KeyedCollection<K, V> + IntoIterator<Item = (K, V)> + 'static,
    KF: Fn(&T) -> K + 'static,
    VF: Fn(T) -> V + 'static,
    F: Fn() -> M + 'static,
{
    let combine_merge = Rc::clone(&merge);
    Collector::from_parts(
        factory,
        move |map: &mut M, item: T| {
            let key = key_mapper(&item);
            let merge = &merge;
            map.merge_entry(key, value_mapper(item), |key, existing, value| merge(key, existing, value))
        },
        move |mut left: M, right: M| {
            for (key, value) in right {
                let merge = &combine_merge;
                left.merge_entry(key, value, |key, existing, value| merge(key, existing, value))?;
            }
            Ok(left)
        },
        |map: M| map,
        CollectorCharacteristics::IDENTITY_FINISH,
    )
}

/// Map of `key_mapper(t)` to `value_mapper(t)`. A repeated key fails the
/// reduction with `StreamError::DuplicateKey` when it is accumulated.
pub fn to_map<T, K, V, KF, VF>(key_mapper: KF, value_mapper: VF) -> Collector<T, HashMap<K, V>, HashMap<K, V>>
where
    T: 'static,
    K: Hash + Eq + fmt::Debug + 'static,
    V: 'static,
    KF: Fn(&T) -> K + 'static,
    VF: Fn(T) -> V + 'static,
{
    keyed(key_mapper, value_mapper, duplicate_key(), HashMap::new)
}

/// Like `to_map`, but values of a repeated key are combined with `merge`
pub fn to_map_merging<T, K, V, KF, VF, MF>(key_mapper: KF, value_mapper: VF, merge: MF) -> Collector<T, HashMap<K, V>, HashMap<K, V>>
where
    T: 'static,
    K: Hash + Eq + 'static,
    V: 'static,
    KF: Fn(&T) -> K + 'static,
    VF: Fn(T) -> V + 'static,
    MF: Fn(V, V) -> V + 'static,
{
    let merge: MergeFn<K, V> = Rc::new(move |_: &K, existing: V, value: V| Ok(merge(existing, value)));
    keyed(key_mapper, value_mapper, merge, HashMap::new)
}

/// Like `to_map_merging`, accumulating into a map from `factory`
pub fn to_map_into<T, K, V, M, KF, VF, MF, F>(key_mapper: KF, value_mapper: VF, merge: MF, factory: F) -> Collector<T, M, M>
where
    T: 'static,
    K: 'static,
    V: 'static,
    M: KeyedCollection<K, V> + IntoIterator<Item = (K, V)> + 'static,
    KF: Fn(&T) -> K + 'static,
    VF: Fn(T) -> V + 'static,
    MF: Fn(V, V) -> V + 'static,
    F: Fn() -> M + 'static,
{
    let merge: MergeFn<K, V> = Rc::new(move |_: &K, existing: V, value: V| Ok(merge(existing, value)));
    keyed(key_mapper, value_mapper, merge, factory)
}

// ================================
// Grouping and partitioning
// ================================

/// Group elements by `classifier` into lists. Keys keep first-seen order.
pub fn grouping_by<T, K, F>(classifier: F) -> Collector<T, IndexMap<K, Vec<T>>, IndexMap<K, Vec<T>>>
where
    T: 'static,
    K: Hash + Eq + 'static,
    F: Fn(&T) -> K + 'static,
{
    grouping_by_with(classifier, to_list())
}

/// Group elements by `classifier`, reducing each group with `downstream`
pub fn grouping_by_with<T, K, A, D, F>(classifier: F, downstream: Collector<T, A, D>) -> Collector<T, IndexMap<K, A>, IndexMap<K, D>>
where
    T: 'static,
    K: Hash + Eq + 'static,
    A: 'static,
    D: 'static,
    F: Fn(&T) -> K + 'static,
{
    grouping_by_into(classifier, IndexMap::new, downstream)
}

/// Group elements by `classifier` into a map from `factory`
pub fn grouping_by_into<T, K, A, D, M, F, MF>(classifier: F, factory: MF, downstream: Collector<T, A, D>) -> Collector<T, IndexMap<K, A>, M>
where
    T: 'static,
    K: Hash + Eq + 'static,
    A: 'static,
    D: 'static,
    M: Extend<(K, D)> + 'static,
    F: Fn(&T) -> K + 'static,
    MF: Fn() -> M + 'static,
{
    let accumulate = downstream.clone();
    let combine = downstream.clone();
    Collector::from_parts(
        IndexMap::new,
        move |groups: &mut IndexMap<K, A>, item: T| {
            let container = groups
                .entry(classifier(&item))
                .or_insert_with(|| accumulate.supply());
            accumulate.accumulate(container, item)
        },
        move |mut left: IndexMap<K, A>, right: IndexMap<K, A>| {
            for (key, container) in right {
                if let Some(slot) = left.get_mut(&key) {
                    let existing = mem::replace(slot, combine.supply());
                    *slot = combine.combine(existing, container)?;
                } else {
                    left.insert(key, container);
                }
            }
            Ok(left)
        },
        move |groups: IndexMap<K, A>| {
            let mut map = factory();
            map.extend(
                groups
                    .into_iter()
                    .map(|(key, container)| (key, downstream.finish(container))),
            );
            map
        },
        CollectorCharacteristics::empty(),
    )
}

/// Per-partition containers used while partitioning
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<A> {
    pub for_true: A,
    pub for_false: A,
}

/// Split elements into those matching `predicate` (`true`) and the rest
/// (`false`). Both keys are always present.
pub fn partitioning_by<T, F>(predicate: F) -> Collector<T, Partition<Vec<T>>, BTreeMap<bool, Vec<T>>>
where
    T: 'static,
    F: Fn(&T) -> bool + 'static,
{
    partitioning_by_with(predicate, to_list())
}

pub fn partitioning_by_with<T, A, D, F>(predicate: F, downstream: Collector<T, A, D>) -> Collector<T, Partition<A>, BTreeMap<bool, D>>
where
    T: 'static,
    A: 'static,
    D: 'static,
    F: Fn(&T) -> bool + 'static,
{
    let supply = downstream.clone();
    let accumulate = downstream.clone();
    let combine = downstream.clone();
    Collector::from_parts(
        move || Partition {
            for_true: supply.supply(),
            for_false: supply.supply(),
        },
        move |partition: &mut Partition<A>, item: T| {
            if predicate(&item) {
                accumulate.accumulate(&mut partition.for_true, item)
            } else {
                accumulate.accumulate(&mut partition.for_false, item)
            }
        },
        move |left: Partition<A>, right: Partition<A>| {
            Ok(Partition {
                for_true: combine.combine(left.for_true, right.for_true)?,
                for_false: combine.combine(left.for_false, right.for_false)?,
            })
        },
        move |partition: Partition<A>| {
            BTreeMap::from([
                (false, downstream.finish(partition.for_false)),
                (true, downstream.finish(partition.for_true)),
            ])
        },
        CollectorCharacteristics::empty(),
    )
}

// ================================
// Numeric reductions
// ================================

pub fn counting<T: 'static>() -> Collector<T, u64, u64> {
    Collector::of(
        || 0u64,
        |count: &mut u64, _: T| *count += 1,
        |left: u64, right: u64| left + right,
        CollectorCharacteristics::empty(),
    )
}

fn summarizing<T, P, F>(mapper: F) -> Collector<T, SummaryStatistics<P>, SummaryStatistics<P>>
where
    T: 'static,
    P: Primitive,
    F: Fn(T) -> P + 'static,
{
    Collector::of(
        SummaryStatistics::new,
        move |stats: &mut SummaryStatistics<P>, item: T| stats.accept(mapper(item)),
        |mut left: SummaryStatistics<P>, right: SummaryStatistics<P>| {
            left.combine(&right);
            left
        },
        CollectorCharacteristics::empty(),
    )
}

pub fn summarizing_int<T, F>(mapper: F) -> Collector<T, IntSummaryStatistics, IntSummaryStatistics>
where
    T: 'static,
    F: Fn(T) -> i32 + 'static,
{
    summarizing(mapper)
}

pub fn summarizing_long<T, F>(mapper: F) -> Collector<T, LongSummaryStatistics, LongSummaryStatistics>
where
    T: 'static,
    F: Fn(T) -> i64 + 'static,
{
    summarizing(mapper)
}

pub fn summarizing_double<T, F>(mapper: F) -> Collector<T, DoubleSummaryStatistics, DoubleSummaryStatistics>
where
    T: 'static,
    F: Fn(T) -> f64 + 'static,
{
    summarizing(mapper)
}

/// Sum of `mapper(t)`, wrapping to 32 bits like `IntStream::sum`
pub fn summing_int<T, F>(mapper: F) -> Collector<T, IntSummaryStatistics, i32>
where
    T: 'static,
    F: Fn(T) -> i32 + 'static,
{
    collecting_and_then(summarizing_int(mapper), |stats| i32::narrow(stats.sum()))
}

pub fn summing_long<T, F>(mapper: F) -> Collector<T, LongSummaryStatistics, i64>
where
    T: 'static,
    F: Fn(T) -> i64 + 'static,
{
    collecting_and_then(summarizing_long(mapper), |stats| stats.sum())
}

/// Compensated sum of `mapper(t)`
pub fn summing_double<T, F>(mapper: F) -> Collector<T, DoubleSummaryStatistics, f64>
where
    T: 'static,
    F: Fn(T) -> f64 + 'static,
{
    collecting_and_then(summarizing_double(mapper), |stats| stats.sum())
}

/// Arithmetic mean of `mapper(t)`; `0.0` for no elements
pub fn averaging_int<T, F>(mapper: F) -> Collector<T, IntSummaryStatistics, f64>
where
    T: 'static,
    F: Fn(T) -> i32 + 'static,
{
    collecting_and_then(summarizing_int(mapper), |stats| stats.average())
}

pub fn averaging_long<T, F>(mapper: F) -> Collector<T, LongSummaryStatistics, f64>
where
    T: 'static,
    F: Fn(T) -> i64 + 'static,
{
    collecting_and_then(summarizing_long(mapper), |stats| stats.average())
}

pub fn averaging_double<T, F>(mapper: F) -> Collector<T, DoubleSummaryStatistics, f64>
where
    T: 'static,
    F: Fn(T) -> f64 + 'static,
{
    collecting_and_then(summarizing_double(mapper), |stats| stats.average())
}

// ================================
// General reductions
// ================================

/// Smallest element under `compare`; the earliest wins among equals
pub fn min_by<T, F>(compare: F) -> Collector<T, Option<T>, Option<T>>
where
    T: 'static,
    F: Fn(&T, &T) -> Ordering + 'static,
{
    reducing_optional(move |a: T, b: T| if compare(&a, &b) != Ordering::Greater { a } else { b })
}

/// Largest element under `compare`; the earliest wins among equals
pub fn max_by<T, F>(compare: F) -> Collector<T, Option<T>, Option<T>>
where
    T: 'static,
    F: Fn(&T, &T) -> Ordering + 'static,
{
    reducing_optional(move |a: T, b: T| if compare(&a, &b) != Ordering::Less { a } else { b })
}

/// Fold with `op` starting from `identity`
pub fn reducing<T, F>(identity: T, op: F) -> Collector<T, Option<T>, T>
where
    T: Clone + 'static,
    F: Fn(T, T) -> T + 'static,
{
    reducing_with(identity, |item: T| item, op)
}

/// Fold `mapper(t)` values with `op` starting from `identity`
pub fn reducing_with<T, U, M, F>(identity: U, mapper: M, op: F) -> Collector<T, Option<U>, U>
where
    T: 'static,
    U: Clone + 'static,
    M: Fn(T) -> U + 'static,
    F: Fn(U, U) -> U + 'static,
{
    let op = Rc::new(op);
    let accumulate_op = Rc::clone(&op);
    let supply_identity = identity.clone();
    Collector::of_with_finisher(
        move || Some(supply_identity.clone()),
        move |acc: &mut Option<U>, item: T| {
            let value = mapper(item);
            *acc = Some(match acc.take() {
                Some(current) => accumulate_op(current, value),
                None => value,
            });
        },
        move |left: Option<U>, right: Option<U>| match (left, right) {
            (Some(left), Some(right)) => Some(op(left, right)),
            (left, None) => left,
            (None, right) => right,
        },
        move |acc: Option<U>| acc.unwrap_or_else(|| identity.clone()),
        CollectorCharacteristics::empty(),
    )
}

/// Fold with `op`; `None` when there are no elements
pub fn reducing_optional<T, F>(op: F) -> Collector<T, Option<T>, Option<T>>
where
    T: 'static,
    F: Fn(T, T) -> T + 'static,
{
    let op = Rc::new(op);
    let accumulate_op = Rc::clone(&op);
    Collector::of(
        || None,
        move |acc: &mut Option<T>, item: T| {
            *acc = Some(match acc.take() {
                Some(current) => accumulate_op(current, item),
                None => item,
            });
        },
        move |left: Option<T>, right: Option<T>| match (left, right) {
            (Some(left), Some(right)) => Some(op(left, right)),
            (left, None) => left,
            (None, right) => right,
        },
        CollectorCharacteristics::empty(),
    )
}

// ================================
// Adapters
// ================================

/// Apply `finisher` to the result of `downstream`
pub fn collecting_and_then<T, A, R, RR, F>(downstream: Collector<T, A, R>, finisher: F) -> Collector<T, A, RR>
where
    T: 'static,
    A: 'static,
    R: 'static,
    RR: 'static,
    F: Fn(R) -> RR + 'static,
{
    downstream.and_then(finisher)
}

/// Feed `mapper(t)` to `downstream` instead of `t`
pub fn mapping<T, U, A, R, F>(mapper: F, downstream: Collector<U, A, R>) -> Collector<T, A, R>
where
    T: 'static,
    U: 'static,
    A: 'static,
    R: 'static,
    F: Fn(T) -> U + 'static,
{
    let supply = downstream.clone();
    let accumulate = downstream.clone();
    let combine = downstream.clone();
    let characteristics = downstream.characteristics();
    Collector::from_parts(
        move || supply.supply(),
        move |container: &mut A, item: T| accumulate.accumulate(container, mapper(item)),
        move |left: A, right: A| combine.combine(left, right),
        move |container: A| downstream.finish(container),
        characteristics,
    )
}

/// Only feed elements matching `predicate` to `downstream`
pub fn filtering<T, A, R, F>(predicate: F, downstream: Collector<T, A, R>) -> Collector<T, A, R>
where
    T: 'static,
    A: 'static,
    R: 'static,
    F: Fn(&T) -> bool + 'static,
{
    let supply = downstream.clone();
    let accumulate = downstream.clone();
    let combine = downstream.clone();
    let characteristics = downstream.characteristics();
    Collector::from_parts(
        move || supply.supply(),
        move |container: &mut A, item: T| {
            if predicate(&item) {
                accumulate.accumulate(container, item)
            } else {
                Ok(())
            }
        },
        move |left: A, right: A| combine.combine(left, right),
        move |container: A| downstream.finish(container),
        characteristics,
    )
}
