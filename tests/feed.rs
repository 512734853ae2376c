//! Integration tests for feed line translation.

mod common;

use common::{CHANNEL, test_bridge};

fn relay(line: &str) -> Vec<String> {
    let out = test_bridge().on_feed_line(line);
    assert!(out.iter().all(|l| l.target == CHANNEL));
    out.into_iter().map(|l| l.text).collect()
}

#[test]
fn test_species_data_line() {
    assert_eq!(
        relay("|/data-pokemon Bulbasaur"),
        vec![
            "Bulbasaur | Grass/Poison-type | \
             \x02\x0314HP:\x0F 45, \x02\x0314Atk:\x0F 49, \x02\x0314Def:\x0F 49, \
             \x02\x0314SpA:\x0F 65, \x02\x0314SpD:\x0F 65, \x02\x0314Spe:\x0F 45, \
             \x02\x0314BST:\x0F 318 | \
             \x02\x0314Abilities:\x0F Overgrow, \x1DChlorophyll\x1D"
        ]
    );
}

#[test]
fn test_data_key_is_normalised() {
    let out = relay("|/data-pokemon Mr. Mime");
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("Mr. Mime | Psychic/Fairy-type | "));
    assert!(out[0].ends_with("Soundproof, Filter, \x1DTechnician\x1D"));
}

#[test]
fn test_move_data_lines() {
    assert_eq!(
        relay("|/data-move tackle"),
        vec![
            "Tackle | Physical | Normal-type | \x02\x0314Power:\x0F 40 | \
             \x02\x0314Accuracy:\x0F 100% | \x02\x0314PP:\x0F 56 | No additional effect."
        ]
    );

    let growl = relay("|/data-move growl").remove(0);
    assert!(!growl.contains("Power"));
    assert!(growl.contains("\x02\x0314PP:\x0F 64"));
}

#[test]
fn test_raw_prefix_is_stripped() {
    assert_eq!(
        relay("|raw|<b>Bold</b> and <em>slanted</em>"),
        vec!["\x02Bold\x02 and \x1Dslanted\x1D"]
    );
}

#[test]
fn test_html_rewrite() {
    assert_eq!(
        relay(r#"See <a href="https://example.com/dex">the dex</a>"#),
        vec!["See [the dex](https://example.com/dex)"]
    );
    assert_eq!(
        relay(r#"<span class="message-effect-weak">Weak</span>"#),
        vec!["\x02\x034Weak\x0F"]
    );
    assert_eq!(
        relay("Learnable &#10003;&nbsp;&nbsp;yes"),
        vec!["Learnable ✓ yes"]
    );
}

#[test]
fn test_list_becomes_lines() {
    assert_eq!(
        relay("<ul><li>one<li>two</ul>"),
        vec![" • one", " • two"]
    );
}

#[test]
fn test_protocol_lines_pass_through() {
    assert_eq!(relay("|turn|5"), vec!["|turn|5"]);
    assert_eq!(relay("|move|p1a: Venusaur|<b>Tackle</b>"), vec!["|move|p1a: Venusaur|\x02Tackle\x02"]);
}

#[test]
fn test_bad_data_line_becomes_placeholder() {
    assert_eq!(
        relay("|/data-berry oran"),
        vec!["\x02\x0314Data:\x0F unavailable (unknown data kind: berry)"]
    );
    assert_eq!(
        relay("|/data-item oran"),
        vec!["\x02\x0314Data:\x0F unavailable (no item named oran)"]
    );
}
