//! ui::report
//!
//! Text and JSON renderings of forest and analysis results.
//!
//! Text renderers return a `String` so commands decide where it goes and
//! tests can compare it directly. JSON output (see [`crate::ui::output::json`])
//! serializes the `*View` types below, or the analysis types themselves
//! where they already have the right shape.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::{ConsolidatedDependencies, Inconsistency, ResolvedDependency};
use crate::core::forest::Forest;
use crate::core::types::{Coordinate, Dependency, Project};
use crate::lookup::UpdateCandidate;

const NONE: &str = "-";

/// One row of the `modules` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleView {
    pub module: String,
    pub id: String,
    pub path: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Declared parent that is not part of the build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_parent: Option<String>,
}

/// The `show` report.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    pub visible_dependencies: Vec<ResolvedDependency>,
}

/// One row of the `deps` report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyView<'a> {
    #[serde(flatten)]
    pub resolved: &'a ResolvedDependency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by: Option<&'a [String]>,
}

pub fn module_views(forest: &Forest) -> Vec<ModuleView> {
    forest
        .projects()
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let parent = forest
                .parent(idx)
                .and_then(|p| forest.get(p))
                .map(|p| p.id().to_string());
            let external_parent = match (&parent, &project.parent) {
                (None, Some(link)) => Some(link.id.to_string()),
                _ => None,
            };
            ModuleView {
                module: project.module_name(),
                id: project.id().to_string(),
                path: project.relative_path.display().to_string(),
                depth: forest.depth(idx),
                parent,
                external_parent,
            }
        })
        .collect()
}

pub fn dependency_views<'a>(
    consolidated: &'a ConsolidatedDependencies,
    usage: Option<&'a BTreeMap<Coordinate, Vec<String>>>,
) -> Vec<DependencyView<'a>> {
    consolidated
        .iter()
        .map(|resolved| DependencyView {
            resolved,
            used_by: usage.map(|u| {
                u.get(&resolved.dependency.coordinate())
                    .map(Vec::as_slice)
                    .unwrap_or(&[])
            }),
        })
        .collect()
}

/// Modules in discovery order, indented by depth.
pub fn render_modules(forest: &Forest) -> String {
    let rows: Vec<Vec<String>> = module_views(forest)
        .into_iter()
        .map(|m| {
            let parent = match (m.parent, m.external_parent) {
                (Some(p), _) => p,
                (None, Some(external)) => format!("{} (external)", external),
                (None, None) => NONE.to_string(),
            };
            vec![
                format!("{}{}", "  ".repeat(m.depth), m.module),
                m.id,
                m.path,
                parent,
            ]
        })
        .collect();
    table(&["MODULE", "ID", "PATH", "PARENT"], &rows)
}

/// Effective view of one project.
pub fn render_project(view: &ProjectView<'_>) -> String {
    let project = view.project;
    let mut out = String::new();

    out.push_str(&format!(
        "{}  ({})\n",
        project.id(),
        project.relative_path.display()
    ));
    if let Some(name) = &project.name {
        out.push_str(&format!("name: {}\n", name));
    }
    out.push_str(&format!(
        "packaging: {}\n",
        project.packaging.as_deref().unwrap_or("jar")
    ));
    if let Some(link) = &project.parent {
        out.push_str(&format!("parent: {}\n", link.id));
    }

    section(&mut out, "properties", &project.effective_properties, |(k, v)| {
        format!("{} = {}", k, v)
    });
    section(&mut out, "dependencies", &project.dependencies, describe);
    section(
        &mut out,
        "managed dependencies",
        &project.managed_dependencies,
        describe,
    );
    section(&mut out, "visible dependencies", &view.visible_dependencies, |r| {
        format!(
            "{}  (from {}{})",
            describe(&r.dependency),
            r.declared_by,
            if r.managed { ", managed" } else { "" }
        )
    });
    out
}

/// The consolidated dependency set, optionally with usage.
pub fn render_dependencies(
    consolidated: &ConsolidatedDependencies,
    usage: Option<&BTreeMap<Coordinate, Vec<String>>>,
) -> String {
    if consolidated.is_empty() {
        return "No dependencies declared.\n".to_string();
    }

    let mut headers = vec!["DEPENDENCY", "VERSION", "SCOPE", "DECLARED BY"];
    if usage.is_some() {
        headers.push("USED BY");
    }

    let rows: Vec<Vec<String>> = dependency_views(consolidated, usage)
        .into_iter()
        .map(|view| {
            let dependency = &view.resolved.dependency;
            let mut row = vec![
                dependency.coordinate().to_string(),
                dependency.version.clone().unwrap_or_else(|| NONE.to_string()),
                dependency.scope.clone().unwrap_or_else(|| NONE.to_string()),
                view.resolved.declared_by.to_string(),
            ];
            if let Some(used_by) = view.used_by {
                row.push(join_or_none(used_by));
            }
            row
        })
        .collect();
    table(&headers, &rows)
}

pub fn render_inconsistencies(inconsistencies: &[Inconsistency]) -> String {
    if inconsistencies.is_empty() {
        return "No version conflicts found.\n".to_string();
    }

    let mut out = String::new();
    for inconsistency in inconsistencies {
        out.push_str(&format!("{}\n", inconsistency.coordinate));
        let width = inconsistency
            .versions
            .keys()
            .map(|v| v.len())
            .max()
            .unwrap_or(0);
        for (version, modules) in &inconsistency.versions {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                version,
                modules.join(", "),
                width = width
            ));
        }
    }
    out.push_str(&format!(
        "\n{} dependenc{} with conflicting versions\n",
        inconsistencies.len(),
        if inconsistencies.len() == 1 { "y" } else { "ies" }
    ));
    out
}

pub fn render_usage(usage: &BTreeMap<Coordinate, Vec<String>>) -> String {
    if usage.is_empty() {
        return "No dependencies declared.\n".to_string();
    }
    let rows: Vec<Vec<String>> = usage
        .iter()
        .map(|(coordinate, modules)| {
            vec![
                coordinate.to_string(),
                modules.len().to_string(),
                modules.join(", "),
            ]
        })
        .collect();
    table(&["DEPENDENCY", "COUNT", "MODULES"], &rows)
}

/// Outdated entries plus a summary line.
pub fn render_updates(updates: &[UpdateCandidate]) -> String {
    let outdated: Vec<&UpdateCandidate> = updates.iter().filter(|u| u.is_outdated()).collect();
    let unknown = updates.iter().filter(|u| u.latest.is_none()).count();

    let mut out = if outdated.is_empty() {
        String::new()
    } else {
        let rows: Vec<Vec<String>> = outdated
            .iter()
            .map(|u| {
                vec![
                    u.kind.to_string(),
                    u.coordinate.to_string(),
                    u.current.clone(),
                    u.latest.clone().unwrap_or_else(|| NONE.to_string()),
                ]
            })
            .collect();
        let mut t = table(&["KIND", "COORDINATE", "CURRENT", "LATEST"], &rows);
        t.push('\n');
        t
    };

    out.push_str(&format!(
        "{} checked, {} outdated, {} unknown\n",
        updates.len(),
        outdated.len(),
        unknown
    ));
    out
}

fn describe(dependency: &Dependency) -> String {
    let mut text = format!(
        "{}:{}",
        dependency.coordinate(),
        dependency.version.as_deref().unwrap_or(NONE)
    );
    let mut extras: Vec<String> = Vec::new();
    if let Some(scope) = &dependency.scope {
        extras.push(scope.clone());
    }
    if let Some(kind) = &dependency.kind {
        extras.push(format!("type={}", kind));
    }
    if dependency.optional == Some(true) {
        extras.push("optional".to_string());
    }
    if !extras.is_empty() {
        text.push_str(&format!(" [{}]", extras.join(", ")));
    }
    text
}

fn section<I, T>(out: &mut String, title: &str, items: I, line: impl Fn(T) -> String)
where
    I: IntoIterator<Item = T>,
{
    let lines: Vec<String> = items.into_iter().map(line).collect();
    out.push_str(&format!("\n{}:\n", title));
    if lines.is_empty() {
        out.push_str(&format!("  {}\n", NONE));
    }
    for l in lines {
        out.push_str(&format!("  {}\n", l));
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}

/// Left-aligned columns separated by two spaces.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = format_row(headers.to_vec());
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
    }
    out
}
