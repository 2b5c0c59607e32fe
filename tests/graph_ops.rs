use ferrite_ann::{Error, Network, NeuronKind, Topology};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DESCRIPTIONS: [&str; 5] = ["1", "2-1", "8-10-10-1", "3-4-2", "5-1-1-5"];

#[test]
fn built_networks_match_their_description() {
    for desc in DESCRIPTIONS {
        let topology = Topology::parse(desc).unwrap();
        let sizes = topology.sizes().to_vec();
        let total: usize = sizes.iter().sum();
        let net = topology.build(None);

        assert_eq!(net.len(), total, "{desc}");
        let inputs = net.neurons().iter().filter(|n| n.kind == NeuronKind::Input).count();
        assert_eq!(inputs, sizes[0], "{desc}");
        if sizes.len() > 1 {
            let outputs = net.neurons().iter().filter(|n| n.kind == NeuronKind::Output).count();
            assert_eq!(outputs, sizes[sizes.len() - 1], "{desc}");
        }
        assert_eq!(topology.layer_index(-1).unwrap(), total - sizes[sizes.len() - 1]);
    }
}

#[test]
fn feed_forward_connection_count() {
    for desc in DESCRIPTIONS {
        let mut net = Network::from_description(desc).unwrap();
        net.connect_full_feed_forward(false).unwrap();
        let sizes = net.topology().unwrap().sizes().to_vec();
        let expected: usize = sizes.windows(2).map(|w| w[0] * w[1]).sum();
        assert_eq!(net.connection_count(), expected, "{desc}");
    }
}

#[test]
fn json_round_trip_keeps_the_graph() {
    let mut net = Network::from_description("3-4-2").unwrap();
    net.connect_full_feed_forward(true).unwrap();
    net.init(0.8, &mut StdRng::seed_from_u64(2024));
    net.forward(&[0.1, 0.5, 0.9], 2).unwrap();

    let path = std::env::temp_dir().join(format!("ferrite_ann_graph_{}.json", std::process::id()));
    net.save_json(&path).unwrap();
    let back = Network::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(back.len(), net.len());
    assert_eq!(back.connection_count(), net.connection_count());
    for (a, b) in net.neurons().iter().zip(back.neurons()) {
        assert_eq!(a.bias, b.bias);
        assert_eq!(a.activation, b.activation);
        assert_eq!(a.kind, b.kind);
        let ca: Vec<_> = net.incoming(a.id()).unwrap().map(|c| (c.source(), c.target(), c.weight)).collect();
        let cb: Vec<_> = back.incoming(b.id()).unwrap().map(|c| (c.source(), c.target(), c.weight)).collect();
        assert_eq!(ca, cb);
    }
    assert_eq!(back.topology().unwrap().to_string(), "3-4-2");
}

#[test]
fn removing_a_neuron_keeps_every_endpoint_valid() {
    let mut net = Network::from_description("3-4-2").unwrap();
    net.connect_full_feed_forward(true).unwrap();
    net.remove_neuron(4).unwrap();

    assert_eq!(net.topology().unwrap().to_string(), "3-3-2");
    assert_eq!(net.connection_count(), 3 * 3 + (3 + 3) * 2);
    for neuron in net.neurons() {
        for conn in net.incoming(neuron.id()).unwrap() {
            assert_eq!(conn.target(), neuron.id());
            assert!(conn.source() < net.len());
            assert!(net.neuron(conn.source()).unwrap().outgoing_count() > 0);
        }
    }
}

#[test]
fn layer_operations_report_their_failures() {
    assert!(matches!(
        Network::from_description("3--1"),
        Err(Error::InvalidTopologyDescription(_))
    ));
    let mut net = Network::with_size(4);
    assert!(matches!(net.cleanup(false, false), Err(Error::TopologyRequired(_))));
    assert!(matches!(net.connect(0, 4), Err(Error::InvalidIndex { index: 4, len: 4 })));
}

#[test]
fn cleanup_then_forward_pass_still_works() {
    let mut net = Network::from_description("2-3-1").unwrap();
    net.connect_full_feed_forward(false).unwrap();
    net.disconnect_to(2, 5).unwrap();
    net.init(0.5, &mut StdRng::seed_from_u64(8));
    net.cleanup(true, false).unwrap();

    assert_eq!(net.topology().unwrap().to_string(), "2-2-1");
    let out = net.forward(&[1.0, 0.0], 1).unwrap();
    assert!(out[0] > 0.0 && out[0] < 1.0);
}
