use ::produce_iter::prelude::*;

async
fn fibs<C : YieldCapability<i32>> (co: C)
{
    let mut prev = 0;
    let mut next = 1;

    co.yield_(prev).await;
    co.yield_(next).await;

    loop {
        let fib = prev + next;
        prev = next;
        next = fib;

        co.yield_(next).await;
    }
}

fn main ()
{
    let _ = ::env_logger::try_init();

    println!("Hello, producer-based iteration!");

    let one_through_ten = produce(|co| async move {
        for i in 1 ..= 10 {
            co.yield_(i).await;
        }
    });
    for i in one_through_ten {
        println!("{}", i);
    }
    println!();

    for () in produce(|_| async {}) {
        println!("This will never happen.");
    }

    for fib in produce(fibs).take_while(|&fib| fib < 1000) {
        println!("{}", fib);
    }
    println!();

    // Same producer, on a thread of its own; which stays parked once we stop
    // pulling.
    for fib in produce_threaded(fibs).take_while(|&fib| fib < 1000) {
        println!("{}", fib);
    }
}
