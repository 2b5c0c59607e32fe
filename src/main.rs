// The binary only inspects saved networks.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run the training demo with:
//   cargo run --example xor
use ferrite_ann::Network;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        println!("ferrite-ann: neural network graphs with backprop, RProp and early stopping.");
        println!("Usage: ferrite-ann <network.json>   print a saved network");
        println!("Run `cargo run --example xor` to see the XOR demo.");
        return;
    };
    match Network::load_json(&path) {
        Ok(network) => {
            if let Some(topology) = network.topology() {
                println!("topology {topology}, {} connections", network.connection_count());
            }
            print!("{network}");
        }
        Err(e) => {
            eprintln!("cannot load {path}: {e}");
            std::process::exit(1);
        }
    }
}
