//! Walkthrough of the tree API: building, printing, traversing, editing
//! and exporting a small family tree.

use arbor_tree::{Node, NodeId, SerializeOptions, Tree, TraversalMode};
use arbor_view::{GlyphSet, RenderOptions, print_tree};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct Person {
    birthday: &'static str,
}

fn create_family_tree() -> Tree<Person> {
    let mut tree = Tree::new();
    tree.create_node(Some("Harry"), Some("harry".into()), None, None)
        .unwrap();
    tree.create_node(
        Some("Jane"),
        Some("jane".into()),
        Some(&"harry".into()),
        Some(Person { birthday: "1978-03-05" }),
    )
    .unwrap();
    tree.create_node(Some("Bill"), Some("bill".into()), Some(&"harry".into()), None)
        .unwrap();
    tree.create_node(Some("Diane"), Some("diane".into()), Some(&"jane".into()), None)
        .unwrap();
    tree.create_node(Some("Mary"), Some("mary".into()), Some(&"diane".into()), None)
        .unwrap();
    tree.create_node(Some("Mark"), Some("mark".into()), Some(&"jane".into()), None)
        .unwrap();
    tree
}

fn example(text: &str) {
    println!("\n{:-^80}\n", format!(" {text} "));
}

fn main() {
    let mut tree = create_family_tree();

    example("Tree of the whole family");
    let by_tag = |a: &Node<Person>, b: &Node<Person>| a.tag().cmp(b.tag());
    print_tree(
        &tree,
        &RenderOptions {
            cmp: Some(&by_tag),
            reverse: true,
            glyphs: GlyphSet::Double,
            ..RenderOptions::default()
        },
    );

    example("All family members in DEPTH mode");
    let tags: Vec<String> = tree
        .expand(None)
        .unwrap()
        .filter_map(|id| tree.get_node(&id).map(|node| node.tag().to_owned()))
        .collect();
    println!("{}", tags.join(", "));

    example("All family members in ZIGZAG mode");
    let tags: Vec<String> = tree
        .expand(None)
        .unwrap()
        .mode(TraversalMode::ZigZag)
        .filter_map(|id| tree.get_node(&id).map(|node| node.tag().to_owned()))
        .collect();
    println!("{}", tags.join(", "));

    example("All family members (with identifiers) but Diane's sub-family");
    let not_diane = |node: &Node<Person>| node.id() != &NodeId::from("diane");
    print_tree(
        &tree,
        &RenderOptions {
            show_ids: true,
            filter: Some(&not_diane),
            ..RenderOptions::default()
        },
    );

    example("Let me introduce Diane's family only");
    let diane_family = tree.subtree(&"diane".into()).unwrap();
    print_tree(&diane_family, &RenderOptions::default());

    example("Children of Diane");
    for child in tree.children(&"diane".into()).unwrap() {
        println!("{}", child.tag());
    }

    example("New members join Bill's family");
    let mut new_tree = Tree::new();
    new_tree
        .create_node(Some("n1"), Some("n1".into()), None, None)
        .unwrap();
    new_tree
        .create_node(Some("n2"), Some("n2".into()), Some(&"n1".into()), None)
        .unwrap();
    new_tree
        .create_node(Some("n3"), Some("n3".into()), Some(&"n1".into()), None)
        .unwrap();
    tree.paste(&"bill".into(), new_tree).unwrap();
    print_tree(&tree, &RenderOptions::default());

    example("They leave after a while");
    tree.remove_node(&"n1".into()).unwrap();
    print_tree(&tree, &RenderOptions::default());

    example("Now Mary moves to live with grandfather Harry");
    tree.move_node(&"mary".into(), &"harry".into()).unwrap();
    print_tree(&tree, &RenderOptions::default());

    example("Family members by birthday where we know it");
    let birthday = |person: &Person| person.birthday.to_owned();
    print_tree(
        &tree,
        &RenderOptions {
            data_label: Some(&birthday),
            ..RenderOptions::default()
        },
    );

    example("A message from Mark climbs up to the oldest Harry");
    let chain: Vec<String> = tree
        .rsearch(&"mark".into(), None)
        .unwrap()
        .filter_map(|id| tree.get_node(id).map(|node| node.tag().to_owned()))
        .collect();
    println!("{}", chain.join(", "));

    example("The family as JSON, sorted by tag");
    println!("{}", tree.to_json(&SerializeOptions::default()).unwrap());
}
