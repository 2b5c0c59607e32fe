use std::ops::ControlFlow;

use ferrite_ann::{BackpropTrainer, CycleStats, Network, PatternSet, RPropTrainer, TrainConfig, Trainer};

fn main() -> ferrite_ann::Result<()> {
    let patterns = PatternSet::from_rows(
        &[vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        &[vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
    )?;

    let mut network = Network::from_description("2-3-1")?;
    network.connect_full_feed_forward(false)?;

    let mut report = |stats: &CycleStats| {
        if stats.cycle % 1000 == 0 {
            println!("Cycle {}: error = {:.6}", stats.cycle, stats.train_error);
        }
        ControlFlow::Continue(())
    };

    let config = TrainConfig::new(5000).with_seed(42);
    let mut trainer = Trainer::new(BackpropTrainer::new(0.5, 0.9), config);
    let mse = trainer.train(&mut network, &patterns, None, Some(&mut report))?;
    println!("backprop: final error {mse:.6}");

    for p in 0..4 {
        let out = network.test_pattern(&patterns, p)?;
        println!("Input: {:?} -> Output: {:.4}", patterns.input_row(p), out[0]);
    }

    // Same task with RProp, holding the patterns out as their own validation
    // set so the UP terminator keeps the best weights.
    let config = TrainConfig::new(500)
        .with_seed(42)
        .with_validation_interval(10)
        .with_terminator("-UP5");
    let mut trainer = Trainer::new(RPropTrainer::new(), config);
    let mse = trainer.train(&mut network, &patterns, Some(&patterns), None)?;
    println!(
        "rprop: final error {mse:.6} after {} cycles{}",
        trainer.record().cycles_trained,
        if trainer.record().restored { " (restored)" } else { "" }
    );
    print!("{network}");
    Ok(())
}
