//! maven detector: pom.xml manifests

use super::npm::directory_name;
use super::{CodeLocation, Detector, DetectorId, Extraction, ToolType};
use crate::graph::{DependencyGraph, DependencyNode, ExternalId, Forge};
use anyhow::Context;
use roxmltree::{Document, Node};
use std::path::Path;

pub const MAVEN_POM: DetectorId = DetectorId("maven-pom");

const POM: &str = "pom.xml";

/// Detects Maven projects by their `pom.xml` and extracts the declared
/// `<dependency>` coordinates. Property-interpolated versions (`${...}`)
/// are left unresolved and recorded without a version piece.
pub struct MavenPomDetector;

impl Detector for MavenPomDetector {
    fn id(&self) -> DetectorId {
        MAVEN_POM
    }

    fn tool_type(&self) -> ToolType {
        ToolType::Maven
    }

    fn applies(&self, directory: &Path) -> bool {
        directory.join(POM).is_file()
    }

    fn extract(&self, directory: &Path) -> Extraction {
        let pom_path = directory.join(POM);
        let content = match std::fs::read_to_string(&pom_path)
            .with_context(|| format!("failed to read {}", pom_path.display()))
        {
            Ok(content) => content,
            Err(err) => return Extraction::exception(err),
        };

        let doc = match Document::parse(&content) {
            Ok(doc) => doc,
            Err(err) => {
                return Extraction::failure(format!(
                    "malformed pom.xml at {}: {}",
                    pom_path.display(),
                    err
                ))
            }
        };

        let project = doc.root_element();
        let group = child_text(project, "groupId")
            .or_else(|| child_of(project, "parent").and_then(|p| child_text(p, "groupId")));
        let artifact = child_text(project, "artifactId");
        let version = child_text(project, "version")
            .or_else(|| child_of(project, "parent").and_then(|p| child_text(p, "version")));

        let name = match (group, artifact) {
            (Some(group), Some(artifact)) => format!("{}:{}", group, artifact),
            (None, Some(artifact)) => artifact.to_string(),
            _ => directory_name(directory).to_string(),
        };

        let mut graph = DependencyGraph::new();
        if let Some(dependencies) = child_of(project, "dependencies") {
            for dependency in dependencies
                .children()
                .filter(|n| n.has_tag_name("dependency"))
            {
                let dep_group = child_text(dependency, "groupId").unwrap_or("unknown");
                let dep_artifact = child_text(dependency, "artifactId").unwrap_or("unknown");
                let dep_version =
                    child_text(dependency, "version").filter(|v| !v.starts_with("${"));
                let id = ExternalId::name_version(
                    Forge::MAVEN,
                    &format!("{}:{}", dep_group, dep_artifact),
                    dep_version,
                );
                graph.add_root(DependencyNode::new(id));
            }
        }

        Extraction::success(vec![CodeLocation {
            source_path: directory.to_path_buf(),
            tool_type: ToolType::Maven,
            external_id: ExternalId::name_version(
                Forge::MAVEN,
                &name,
                version.filter(|v| !v.starts_with("${")),
            ),
            graph,
        }])
    }
}

fn child_of<'a>(node: Node<'a, 'a>, tag: &str) -> Option<Node<'a, 'a>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn child_text<'a>(node: Node<'a, 'a>, tag: &str) -> Option<&'a str> {
    child_of(node, tag).and_then(|n| n.text()).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bomtool::ExtractionOutcome;
    use tempfile::TempDir;

    const POM_XML: &str = r#"<?xml version="1.0"?>
<project>
  <groupId>com.example</groupId>
  <artifactId>service</artifactId>
  <version>1.4.0</version>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>1.7.30</version>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>${guava.version}</version>
    </dependency>
  </dependencies>
</project>"#;

    #[test]
    fn test_extract_coordinates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pom.xml"), POM_XML).unwrap();

        let extraction = MavenPomDetector.extract(dir.path());
        assert_eq!(extraction.outcome, ExtractionOutcome::Success);

        let location = &extraction.code_locations[0];
        assert_eq!(location.external_id.name(), Some("com.example:service"));
        assert_eq!(location.external_id.version(), Some("1.4.0"));
        assert!(location.graph.contains(&ExternalId::name_version(
            Forge::MAVEN,
            "org.slf4j:slf4j-api",
            Some("1.7.30")
        )));
        // unresolved property reference drops the version piece
        assert!(location.graph.contains(&ExternalId::name_version(
            Forge::MAVEN,
            "com.google.guava:guava",
            None
        )));
    }

    #[test]
    fn test_malformed_pom_is_failure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pom.xml"), "<project><unclosed>").unwrap();

        let extraction = MavenPomDetector.extract(dir.path());
        assert_eq!(extraction.outcome, ExtractionOutcome::Failure);
    }
}
