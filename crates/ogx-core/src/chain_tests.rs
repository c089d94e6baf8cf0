use std::collections::BTreeMap;

use crate::{ChainError, FreeVariableChain, Position};

#[test]
fn parse_dotted_chain() {
    let chain: FreeVariableChain = "np.linalg.norm".parse().unwrap();
    assert_eq!(chain.root(), "np");
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.to_string(), "np.linalg.norm");
}

#[test]
fn empty_chain_rejected() {
    assert_eq!("".parse::<FreeVariableChain>(), Err(ChainError::Empty));
    assert_eq!(
        "a..b".parse::<FreeVariableChain>(),
        Err(ChainError::EmptyComponent("a..b".into()))
    );
    assert_eq!(
        FreeVariableChain::new(Vec::<String>::new()),
        Err(ChainError::Empty)
    );
}

#[test]
fn prefix_and_child() {
    let chain: FreeVariableChain = "a.b.c".parse().unwrap();
    assert_eq!(chain.prefix(2).unwrap().dotted(), "a.b");
    assert_eq!(chain.prefix(0), None);
    assert_eq!(chain.prefix(4), None);
    assert_eq!(chain.child("d").dotted(), "a.b.c.d");
}

#[test]
fn ordering_is_component_wise() {
    // Component order, not string order: `a.b` < `a.b.c` < `ab`.
    let mut table = BTreeMap::new();
    for s in ["ab", "a.b.c", "a.b", "a"] {
        table.insert(s.parse::<FreeVariableChain>().unwrap(), ());
    }
    let keys: Vec<String> = table.keys().map(|c| c.dotted()).collect();
    insta::assert_snapshot!(keys.join(" "), @"a a.b a.b.c ab");
}

#[test]
fn position_display() {
    assert_eq!(Position::new(3, 8).to_string(), "3:8");
}
