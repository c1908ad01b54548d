use crate::net::{BuildPhase, IfaceConfig, NodeRole, TopoError, TopologyBuilder};
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

fn net(s: &str) -> Ipv4Net {
    s.parse().expect("valid cidr")
}

fn addr(s: &str) -> Ipv4Addr {
    s.parse().expect("valid address")
}

#[test]
fn router_gets_edge_gateway_and_reserved_backbone_iface() {
    let mut b = TopologyBuilder::new();
    let ra = b.add_router("ra", net("192.168.1.0/24")).expect("add ra");

    let meta = &b.routers()[0];
    assert_eq!(meta.node, ra);
    assert_eq!(meta.edge_subnet, net("192.168.1.0/24"));
    assert_eq!(meta.edge_addr, addr("192.168.1.1"));
    assert_eq!(meta.backbone_addr, None);

    let edge = b.iface(meta.edge_iface);
    assert_eq!(edge.name, "ra-eth1");
    assert_eq!(edge.addr, Some(net("192.168.1.1/24")));
    let backbone = b.iface(meta.backbone_iface);
    assert_eq!(backbone.name, "ra-eth2");
    assert_eq!(backbone.addr, None);

    assert_eq!(b.node(ra).role, NodeRole::Router);
}

#[test]
fn duplicate_node_name_fails() {
    let mut b = TopologyBuilder::new();
    b.add_router("ra", net("192.168.1.0/24")).expect("add ra");

    let err = b.add_router("ra", net("192.168.2.0/24")).unwrap_err();
    assert_eq!(
        err,
        TopoError::DuplicateName {
            name: "ra".to_string()
        }
    );

    // Names are unique across roles, not per role.
    let err = b.add_switch("ra").unwrap_err();
    assert_eq!(
        err,
        TopoError::DuplicateName {
            name: "ra".to_string()
        }
    );
}

#[test]
fn host_with_unknown_gateway_fails() {
    let mut b = TopologyBuilder::new();
    b.add_router("ra", net("192.168.1.0/24")).expect("add ra");

    let err = b
        .add_host("h1", net("192.168.9.100/24"), addr("192.168.9.1"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::UnknownGateway {
            gateway: addr("192.168.9.1")
        }
    );
    // Fail-fast: the rejected host left no node behind.
    assert!(b.node_id("h1").is_none());
}

#[test]
fn host_gateway_matching_two_routers_fails() {
    let mut b = TopologyBuilder::new();
    b.add_router("ra", net("192.168.1.0/24")).expect("add ra");
    b.add_router("rb", net("192.168.1.0/24")).expect("add rb");

    let err = b
        .add_host("h1", net("192.168.1.100/24"), addr("192.168.1.1"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::UnknownGateway {
            gateway: addr("192.168.1.1")
        }
    );
}

#[test]
fn connecting_same_named_interface_twice_fails() {
    let mut b = TopologyBuilder::new();
    let ra = b.add_router("ra", net("192.168.1.0/24")).expect("add ra");
    let s1 = b.add_switch("s1").expect("add s1");
    let s2 = b.add_switch("s2").expect("add s2");

    b.connect_cfg(s1, IfaceConfig::default(), ra, IfaceConfig::named("ra-eth1"))
        .expect("first link");
    let err = b
        .connect_cfg(s2, IfaceConfig::default(), ra, IfaceConfig::named("ra-eth1"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::InterfaceInUse {
            node: "ra".to_string(),
            iface: "ra-eth1".to_string(),
        }
    );
    // The failed call must not leave a dangling interface on s2.
    assert!(b.node(s2).ifaces.is_empty());
}

#[test]
fn self_link_fails() {
    let mut b = TopologyBuilder::new();
    let s1 = b.add_switch("s1").expect("add s1");
    let err = b.connect(s1, s1).unwrap_err();
    assert_eq!(
        err,
        TopoError::SelfLink {
            node: "s1".to_string()
        }
    );
}

#[test]
fn backbone_address_collision_fails() {
    let mut b = TopologyBuilder::new();
    let ra = b.add_router("ra", net("192.168.1.0/24")).expect("add ra");
    let rb = b.add_router("rb", net("192.168.2.0/24")).expect("add rb");

    b.add_backbone_link(ra, net("192.168.4.0/24"), addr("192.168.4.1"))
        .expect("ra backbone");
    let err = b
        .add_backbone_link(rb, net("192.168.4.0/24"), addr("192.168.4.1"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::AddressConflict {
            addr: addr("192.168.4.1")
        }
    );
}

#[test]
fn backbone_address_reassignment_fails() {
    let mut b = TopologyBuilder::new();
    let ra = b.add_router("ra", net("192.168.1.0/24")).expect("add ra");

    b.add_backbone_link(ra, net("192.168.4.0/24"), addr("192.168.4.1"))
        .expect("ra backbone");
    let err = b
        .add_backbone_link(ra, net("192.168.4.0/24"), addr("192.168.4.2"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::AddressConflict {
            addr: addr("192.168.4.2")
        }
    );
}

#[test]
fn backbone_address_outside_subnet_fails() {
    let mut b = TopologyBuilder::new();
    let ra = b.add_router("ra", net("192.168.1.0/24")).expect("add ra");

    let err = b
        .add_backbone_link(ra, net("192.168.4.0/24"), addr("192.168.5.1"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::AddressOutsideSubnet {
            addr: addr("192.168.5.1"),
            subnet: net("192.168.4.0/24"),
        }
    );
    assert_eq!(b.routers()[0].backbone_addr, None);
}

#[test]
fn backbone_link_on_non_router_fails() {
    let mut b = TopologyBuilder::new();
    let s1 = b.add_switch("s1").expect("add s1");
    let err = b
        .add_backbone_link(s1, net("192.168.4.0/24"), addr("192.168.4.1"))
        .unwrap_err();
    assert_eq!(
        err,
        TopoError::NotARouter {
            name: "s1".to_string()
        }
    );
}

#[test]
fn mutation_after_route_derivation_fails_with_phase_error() {
    let mut b = TopologyBuilder::new();
    let ra = b.add_router("ra", net("192.168.1.0/24")).expect("add ra");
    b.add_backbone_link(ra, net("192.168.4.0/24"), addr("192.168.4.1"))
        .expect("ra backbone");
    b.derive_routes().expect("derive");
    assert_eq!(b.phase(), BuildPhase::RoutesDerived);

    let err = b.add_switch("s1").unwrap_err();
    assert_eq!(
        err,
        TopoError::InvalidPhase {
            op: "add_switch",
            phase: BuildPhase::RoutesDerived,
        }
    );
    let err = b
        .add_host("h1", net("192.168.1.100/24"), addr("192.168.1.1"))
        .unwrap_err();
    assert!(matches!(err, TopoError::InvalidPhase { op: "add_host", .. }));
}

#[test]
fn connect_reuses_the_host_prebuilt_interface() {
    let mut b = TopologyBuilder::new();
    b.add_router("ra", net("192.168.1.0/24")).expect("add ra");
    let s1 = b.add_switch("s1").expect("add s1");
    let h1 = b
        .add_host("h1", net("192.168.1.100/24"), addr("192.168.1.1"))
        .expect("add h1");

    let link = b.connect(h1, s1).expect("link h1-s1");

    // The cable lands on the addressed h1-eth0, not on a fresh interface.
    assert_eq!(b.node(h1).ifaces.len(), 1);
    let iface = b.iface(b.node(h1).ifaces[0]);
    assert_eq!(iface.name, "h1-eth0");
    assert_eq!(iface.addr, Some(net("192.168.1.100/24")));
    assert_eq!(iface.link, Some(link));
}

#[test]
fn generated_interface_names_follow_node_and_index() {
    let mut b = TopologyBuilder::new();
    let s1 = b.add_switch("s1").expect("add s1");
    let s2 = b.add_switch("s2").expect("add s2");
    let s3 = b.add_switch("s3").expect("add s3");

    b.connect(s1, s2).expect("link s1-s2");
    b.connect(s1, s3).expect("link s1-s3");

    let names: Vec<&str> = b
        .node(s1)
        .ifaces
        .iter()
        .map(|i| b.iface(*i).name.as_str())
        .collect();
    assert_eq!(names, vec!["s1-eth0", "s1-eth1"]);
}
