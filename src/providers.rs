//! Dynamic content for posts whose markdown uses `{{key}}` placeholders.

use crate::content::{Fragments, Registry};
use crate::html::{el, Node};

/// Registers every provider the site ships with.
pub fn register(registry: &mut Registry) {
    registry.register("random-integers", random_integers);
}

/// `{{modulo_bias}}`: the distribution of `x % 6` over every output of a
/// 3-bit generator, showing why naive modulo over-weights the low faces.
fn random_integers() -> anyhow::Result<Fragments> {
    let mut fragments = Fragments::new();
    fragments.insert("modulo_bias".to_owned(), modulo_bias(8, 6));
    Ok(fragments)
}

fn modulo_bias(outputs: u32, faces: u32) -> Node {
    let mut counts = vec![0u32; faces as usize];
    for x in 0..outputs {
        counts[(x % faces) as usize] += 1;
    }
    let rows = counts.iter().enumerate().map(|(face, count)| {
        el("tr")
            .child(el("td").text((face + 1).to_string()))
            .child(el("td").text(format!("{}/{}", count, outputs)))
    });
    el("table")
        .class("modulo-bias")
        .child(el("thead").child(el("tr").child(el("th").text("Face")).child(el("th").text("Probability"))))
        .child(el("tbody").children(rows))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_has_random_integers() {
        let registry = Registry::builtin();
        assert!(registry.get("random-integers").is_some());
        assert!(registry.get("autodiff").is_none());
    }

    #[test]
    fn test_modulo_bias_favors_low_faces() {
        let html = modulo_bias(8, 6).render();
        assert!(html.as_str().contains("<tr><td>1</td><td>2/8</td></tr>"));
        assert!(html.as_str().contains("<tr><td>2</td><td>2/8</td></tr>"));
        assert!(html.as_str().contains("<tr><td>6</td><td>1/8</td></tr>"));
    }
}
