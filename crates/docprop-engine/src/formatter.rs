//! Human-readable rendering of propagated descriptions

use crate::propagation::UpstreamDescriptions;
use docprop_core::node_type;

/// Markdown link to a node in the dbt docs site
pub fn format_node_link_in_markdown(node_id: &str) -> String {
    format!("[{}](/#!/{}/{})", node_id, node_type(node_id), node_id)
}

/// Render upstream descriptions with their provenance
///
/// Identical descriptions are grouped and list all of their source nodes.
/// Distinct descriptions become separate paragraphs.
pub fn format_upstream_descriptions(descriptions: &UpstreamDescriptions) -> String {
    format_upstream_descriptions_with(descriptions, format_node_link_in_markdown)
}

/// Same as [`format_upstream_descriptions`] with a custom link renderer
pub fn format_upstream_descriptions_with<F>(descriptions: &UpstreamDescriptions, link: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut sorted: Vec<(&String, &String)> = descriptions.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    // Description -> contributing nodes, in first-occurrence order
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    for (node_id, description) in sorted {
        match grouped.iter_mut().find(|(text, _)| *text == description.as_str()) {
            Some((_, node_ids)) => node_ids.push(node_id.as_str()),
            None => grouped.push((description.as_str(), vec![node_id.as_str()])),
        }
    }

    grouped
        .into_iter()
        .map(|(description, node_ids)| {
            let mut links: Vec<String> = node_ids.into_iter().map(&link).collect();
            links.sort();

            format!("{} [propagated from {}]", description, links.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
