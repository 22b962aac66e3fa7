use super::*;
cfg_not_loom! {
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing_test::traced_test;

#[test]
fn st_push_pop_in_order() {
    let queue = BoundedQueue::<i32>::new(4).unwrap();

    queue.push(1);
    queue.push(2);
    queue.push(3);

    assert_eq!(queue.pop(), 1);
    assert_eq!(queue.pop(), 2);
    assert_eq!(queue.pop(), 3);
    assert!(queue.is_empty());
}

#[test]
fn st_holds_one_less_than_capacity() {
    let queue = BoundedQueue::<i32>::new(4).unwrap();

    assert_eq!(queue.try_push(1), Ok(()));
    assert_eq!(queue.try_push(2), Ok(()));
    assert_eq!(queue.try_push(3), Ok(()));
    assert_eq!(queue.try_push(4), Err(TryPushError::Full(4)));
    assert!(queue.is_full());
    assert_eq!(queue.len(), 3);

    assert_eq!(queue.try_pop(), Ok(1));
    assert_eq!(queue.try_push(4), Ok(()));
    assert_eq!(queue.try_pop(), Ok(2));
    assert_eq!(queue.try_pop(), Ok(3));
    assert_eq!(queue.try_pop(), Ok(4));
    assert_eq!(queue.try_pop(), Err(TryPopError::Empty));
}

#[test]
fn st_wraps_around() {
    let queue = BoundedQueue::<usize>::new(3).unwrap();
    for i in 0..10 {
        queue.push(2 * i);
        queue.push(2 * i + 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), 2 * i);
        assert_eq!(queue.pop(), 2 * i + 1);
    }
    assert!(queue.is_empty());
}

#[test]
fn zero_capacity_is_rejected() {
    assert_eq!(
        BoundedQueue::<()>::new(0).unwrap_err(),
        ConstructionError::ZeroCapacity
    );
}

#[test]
fn huge_capacity_is_a_recoverable_error() {
    match BoundedQueue::<u64>::new(usize::MAX) {
        Err(ConstructionError::Alloc(_)) => {}
        other => panic!("expected an allocation error, got {other:?}"),
    }
}

#[test]
#[traced_test]
fn capacity_one_never_admits() {
    let queue = BoundedQueue::<u8>::new(1).unwrap();
    assert!(logs_contain("can never hold an element"));
    assert!(queue.is_full());
    assert!(queue.is_empty());
    assert_eq!(queue.try_push(7).map_err(TryPushError::into_inner), Err(7));
}

#[test]
fn drops_queued_elements() {
    use std::rc::Rc;
    let rc = Rc::new(());
    {
        let queue = BoundedQueue::new(8).unwrap();
        for _ in 0..5 {
            queue.push(rc.clone());
        }
        drop(queue.pop());
        assert_eq!(Rc::strong_count(&rc), 5);
    }
    assert_eq!(Rc::strong_count(&rc), 1);
}

#[test]
fn debug_doesnt_need_debug_elements() {
    struct Opaque;
    let queue = BoundedQueue::new(3).unwrap();
    queue.push(Opaque);
    assert_eq!(format!("{queue:?}"), "BoundedQueue { capacity: 3, len: 1 }");
}

#[test]
fn push_blocks_while_full() {
    let queue = Arc::new(BoundedQueue::<u8>::new(3).unwrap());
    queue.push(0);
    queue.push(1);

    let (done_tx, done_rx) = mpsc::channel();
    let pusher = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            queue.push(2);
            done_tx.send(()).unwrap();
        })
    };

    assert_eq!(
        done_rx.recv_timeout(Duration::from_millis(100)),
        Err(mpsc::RecvTimeoutError::Timeout),
        "a push into a full queue should block"
    );
    assert_eq!(queue.pop(), 0);
    done_rx.recv().unwrap();
    pusher.join().unwrap();

    assert_eq!(queue.pop(), 1);
    assert_eq!(queue.pop(), 2);
}

#[test]
fn pop_blocks_while_empty() {
    let queue = Arc::new(BoundedQueue::<u8>::new(2).unwrap());

    let (done_tx, done_rx) = mpsc::channel();
    let popper = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            done_tx.send(queue.pop()).unwrap();
        })
    };

    assert_eq!(
        done_rx.recv_timeout(Duration::from_millis(100)),
        Err(mpsc::RecvTimeoutError::Timeout),
        "a pop from an empty queue should block"
    );
    queue.push(42);
    assert_eq!(done_rx.recv().unwrap(), 42);
    popper.join().unwrap();
}

#[test]
fn mt_single_producer_single_consumer_order() {
    const N: u32 = 10_000;
    let queue = Arc::new(BoundedQueue::new(4).unwrap());
    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..N {
                queue.push(i);
            }
        })
    };
    for i in 0..N {
        assert_eq!(queue.pop(), i, "elements should be popped in push order");
    }
    producer.join().unwrap();
}

#[test]
fn mt_many_producers_many_consumers() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 2_500;

    let queue = Arc::new(BoundedQueue::new(5).unwrap());
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();
    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                (0..PRODUCERS * PER_PRODUCER / CONSUMERS)
                    .map(|_| queue.pop())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    let mut seen: Vec<usize> = consumers
        .into_iter()
        .flat_map(|c| c.join().unwrap())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..PRODUCERS * PER_PRODUCER).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

}

cfg_loom! {
use loom::sync::Arc;
use loom::thread;

// capacity 2 holds a single element, so every other push has to wait.
const CAPACITY: usize = 2;
const ITEMS: u8 = 3;

#[test]
fn block_push_block_pop() {
    let mut model = loom::model::Builder::new();
    model.max_threads = 2;
    model.check(|| {
        let queue = Arc::new(BoundedQueue::new(CAPACITY).unwrap());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..ITEMS {
                    queue.push(i);
                }
            })
        };
        for i in 0..ITEMS {
            assert_eq!(
                queue.pop(),
                i,
                "Data should be popped in the same order as it was pushed."
            );
        }
        producer.join().unwrap();
    });
}

#[test]
fn try_push_block_pop() {
    let mut model = loom::model::Builder::new();
    model.max_threads = 2;
    model.check(|| {
        let queue = Arc::new(BoundedQueue::new(CAPACITY).unwrap());
        {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..ITEMS {
                    let mut item = i;
                    while let Err(TryPushError::Full(ret)) = queue.try_push(item) {
                        item = ret;
                        thread::yield_now();
                    }
                }
            });
        }
        for i in 0..ITEMS {
            assert_eq!(queue.pop(), i);
        }
    });
}

#[test]
fn two_producers_one_consumer() {
    let mut model = loom::model::Builder::new();
    model.max_threads = 3;
    model.preemption_bound = Some(3);
    model.check(|| {
        let queue = Arc::new(BoundedQueue::new(CAPACITY).unwrap());
        for p in 0..2u8 {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.push(p));
        }
        let mut got = [queue.pop(), queue.pop()];
        got.sort_unstable();
        assert_eq!(got, [0, 1]);
    });
}
}
