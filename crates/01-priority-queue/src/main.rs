use priority_queue::PriorityQueue;

fn main() {
    println!("=== Stable Min-Priority Queue ===\n");

    let mut timers = PriorityQueue::new();
    timers.push("flush-cache", 40);
    timers.push("heartbeat", 10);
    timers.push("retry-send", 10);
    timers.push("gc-sweep", 25);

    println!("  Timer wheel (key = deadline tick):\n");
    println!("  head deadline: {:?}", timers.head_priority());
    while let Some(task) = timers.pop() {
        println!("    fired {task}");
    }

    println!("\n  FIFO among equal keys keeps 'heartbeat' ahead of 'retry-send'.");

    let mut ready = PriorityQueue::new();
    ready.push(("worker", 0u64), 1);
    ready.push(("batch", 0u64), 2);
    println!("\n  Run queue with in-place head update:\n");
    let (name, ticks) = *ready.peek().expect("queue is non-empty");
    ready.update_head((name, ticks + 1));
    println!("    head after one tick: {:?}", ready.peek());
    println!("    position and key unchanged: {:?}", ready.head_priority());
}
