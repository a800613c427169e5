//! Demo policy template rendering.
//!
//! Renders a self-contained `.pt` document from an extracted schema: a demo
//! header, one datasource per incident pointing at its fake table, and a
//! policy block whose `validate_each` blocks re-declare the exported fields.
//! The output is valid input for the extractor, which keeps the demo data
//! pipeline closed under its own tooling.

use std::fmt::Write;
use std::path::Path;

use crate::schema::{Incident, TemplateSchema};

/// Render a complete demo template for one schema.
pub fn render_template(schema: &TemplateSchema) -> String {
    let mut out = String::new();
    out.push_str(&render_header(schema));
    out.push_str(&render_datasources(&schema.incidents));
    out.push_str(
        "###############################################################################\n\
         # Policy\n\
         ###############################################################################\n\
         \n\
         policy \"pol_incident\" do\n",
    );
    out.push_str(&render_validations(&schema.incidents));
    out.push_str("end\n");
    out
}

fn render_header(schema: &TemplateSchema) -> String {
    let name = schema.name.as_deref().unwrap_or("");
    format!(
        r#"# DEMO POLICY TEMPLATE. DOES NOT PRODUCE REAL RESULTS.
name "{name}"
rs_pt_ver 20180301
type "policy"
short_description "Demo copy of {name}. Produces canned incident data only."
long_description ""
category "Cost"
severity "low"
default_frequency "weekly"
info(
  version: "{version}",
  provider: "{cloud}",
  service: "{service}",
  policy_set: "{policy_set}",
  recommendation_type: "{recommendation_type}",
  hide_skip_approvals: "true"
)

###############################################################################
# Datasources & Scripts
###############################################################################

"#,
        version = schema.version.as_deref().unwrap_or(""),
        cloud = schema.cloud.as_deref().unwrap_or(""),
        service = schema.service.as_deref().unwrap_or(""),
        policy_set = schema.policy_set.as_deref().unwrap_or(""),
        recommendation_type = schema.recommendation_type.as_deref().unwrap_or(""),
    )
}

fn render_datasources(incidents: &[Incident]) -> String {
    let mut out = String::new();
    for incident in incidents {
        let path = incident.path.as_deref().unwrap_or("");
        let _ = write!(
            out,
            "datasource \"{ds}\" do\n  \
               request do\n    \
                 verb \"GET\"\n    \
                 host \"raw.githubusercontent.com\"\n    \
                 path \"/flexera-public/cco_demo/refs/heads/demo_data/{path}\"\n  \
               end\n\
             end\n\n",
            ds = datasource_name(path),
        );
    }
    out
}

fn render_validations(incidents: &[Incident]) -> String {
    let mut out = String::new();
    for incident in incidents {
        let path = incident.path.as_deref().unwrap_or("");
        let summary = incident.summary_template.as_deref().unwrap_or("");
        let _ = write!(
            out,
            "  validate_each ${ds} do\n    \
               summary_template \"{summary}\"\n    \
               check eq(0, 1)\n    \
               export do\n      \
                 resource_level true\n",
            ds = datasource_name(path),
        );
        for field in &incident.export {
            let _ = write!(
                out,
                "      field \"{name}\" do\n        \
                   label \"{label}\"\n      \
                 end\n",
                name = field.name,
                label = field.label.as_deref().unwrap_or(""),
            );
        }
        out.push_str("    end\n  end\n");
    }
    out
}

/// Datasource identifier derived from the incident table path,
/// e.g. `ds_aws_old_snapshots_1`.
fn datasource_name(incident_path: &str) -> String {
    let stem = Path::new(incident_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    format!("ds_{stem}")
}
