use std::collections::HashSet;
use std::time::Duration;

use predict_lite::error::PredictError;
use predict_lite::scheduler::{Task, TaskQueue};
use uuid::Uuid;

fn task(input: &str) -> Task {
    Task::new(Uuid::new_v4(), input.to_string())
}

#[tokio::test]
async fn test_dequeue_is_fifo() {
    let queue = TaskQueue::new();
    let tasks: Vec<Task> = (0..5).map(|i| task(&format!("input-{}", i))).collect();
    for t in &tasks {
        queue.enqueue(t.clone()).unwrap();
    }
    assert_eq!(queue.len(), 5);

    for expected in tasks {
        assert_eq!(queue.dequeue().await, Some(expected));
    }
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_dequeue_waits_for_task() {
    let queue = TaskQueue::new();

    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.dequeue().await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!consumer.is_finished());

    let t = task("late");
    queue.enqueue(t.clone()).unwrap();

    let received = tokio::time::timeout(Duration::from_secs(1), consumer)
        .await
        .expect("consumer should wake up")
        .unwrap();
    assert_eq!(received, Some(t));
}

#[tokio::test]
async fn test_close_wakes_blocked_consumers() {
    let queue = TaskQueue::new();

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(queue.close());
    assert!(queue.is_closed());

    for consumer in consumers {
        let received = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("consumer should observe shutdown")
            .unwrap();
        assert!(received.is_none());
    }
}

#[tokio::test]
async fn test_close_drains_queued_tasks_first() {
    let queue = TaskQueue::new();
    let first = task("a");
    let second = task("b");
    queue.enqueue(first.clone()).unwrap();
    queue.enqueue(second.clone()).unwrap();

    queue.close();

    assert_eq!(queue.dequeue().await, Some(first));
    assert_eq!(queue.dequeue().await, Some(second));
    assert_eq!(queue.dequeue().await, None);
}

#[tokio::test]
async fn test_enqueue_after_close_is_rejected() {
    let queue = TaskQueue::new();
    queue.close();

    let result = queue.enqueue(task("too late"));
    assert!(matches!(result, Err(PredictError::ShuttingDown)));
    // Closing twice reports that the queue was already closed
    assert!(!queue.close());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_task_delivered_to_exactly_one_consumer() {
    let queue = TaskQueue::new();
    let total = 1_000;
    let ids: Vec<Uuid> = (0..total).map(|_| Uuid::new_v4()).collect();

    let consumers: Vec<_> = (0..8)
        .map(|_| {
            let queue = queue.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(task) = queue.dequeue().await {
                    seen.push(task.job_id);
                }
                seen
            })
        })
        .collect();

    for id in &ids {
        queue.enqueue(Task::new(*id, "x".to_string())).unwrap();
    }
    queue.close();

    let mut delivered = Vec::new();
    for consumer in consumers {
        delivered.extend(consumer.await.unwrap());
    }

    assert_eq!(delivered.len(), total);
    let unique: HashSet<Uuid> = delivered.into_iter().collect();
    assert_eq!(unique, ids.into_iter().collect::<HashSet<_>>());
}
