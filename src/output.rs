//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Association, Item, Package};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Item {
    fn pretty_print(&self) -> String {
        let id = self.id();
        let divider = "─".repeat(id.chars().count().max(30));

        let mut lines = vec![format!("Item: {}", id), divider];

        if let Some(ref headline) = self.headline {
            lines.push(format!("Headline:       {}", headline));
        }

        if let Some(ref item_type) = self.item_type {
            lines.push(format!("Type:           {}", item_type));
        }

        if let Some(ref byline) = self.byline {
            lines.push(format!("Byline:         {}", byline));
        }

        if let Some(ref version) = self.version {
            lines.push(format!("Version:        {}", version));
        }

        if let Some(ref created) = self.versioncreated {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.push(format!("URI:            {}", self.uri));

        lines.join("\n")
    }
}

impl PrettyPrint for Package {
    fn pretty_print(&self) -> String {
        let id = self.id();
        let divider = "─".repeat(id.chars().count().max(30));

        let mut lines = vec![format!("Package: {}", id), divider];

        if let Some(ref headline) = self.headline {
            lines.push(format!("Headline:       {}", headline));
        }

        if let Some(ref created) = self.versioncreated {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.push(format!("URI:            {}", self.uri));

        // Association tree, one line per entry
        if let Some(ref groups) = self.associations {
            lines.push(format!("Associations:   {}", self.association_count()));
            for (group, entries) in groups {
                lines.push(format!("  [{}]", group));
                for (name, association) in entries {
                    lines.push(format!("    {:<14}{}", name, describe(association)));
                }
            }
        }

        lines.join("\n")
    }
}

fn describe(association: &Association) -> String {
    match association {
        Association::Reference(reference) => {
            format!("{} -> {}", reference.ref_type, reference.uri)
        }
        Association::Item(item) => format!(
            "{} \"{}\"",
            item.item_type.as_deref().unwrap_or("item"),
            item.headline.as_deref().unwrap_or_default()
        ),
        Association::Package(package) => format!(
            "package \"{}\" ({} associations)",
            package.headline.as_deref().unwrap_or_default(),
            package.association_count()
        ),
    }
}
