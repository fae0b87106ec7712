//! Designer backend of the reference engine

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::info;

use super::in_memory::InMemoryWorkflowEngine;
use crate::domain::{DesignerRequest, DomainError, ProcessScheme};

pub(super) async fn handle(
    engine: &InMemoryWorkflowEngine,
    request: DesignerRequest,
) -> Result<String, DomainError> {
    let operation = request
        .operation()
        .filter(|op| !op.trim().is_empty())
        .ok_or_else(|| DomainError::validation("Designer operation is required"))?;

    match operation {
        "load" => {
            let scheme = load(engine, &request).await?;
            to_json(&scheme)
        }
        "exists" => {
            let code = scheme_code(&request)?;
            Ok(engine.scheme_exists(code).await.to_string())
        }
        "save" | "uploadscheme" => {
            let scheme = parse_upload(&request)?;
            let json = to_json(&scheme)?;
            info!(scheme = %scheme.code, operation = %operation, "Scheme stored from designer");
            engine.register_scheme(scheme).await?;
            Ok(json)
        }
        "downloadscheme" => {
            let scheme = load(engine, &request).await?;
            render_xml(&scheme)
        }
        other => Err(DomainError::validation(format!(
            "Designer operation '{}' is not supported",
            other
        ))),
    }
}

fn scheme_code(request: &DesignerRequest) -> Result<&str, DomainError> {
    request
        .parameters
        .get_non_blank("schemecode")
        .ok_or_else(|| DomainError::validation("Parameter 'schemecode' is required"))
}

async fn load(
    engine: &InMemoryWorkflowEngine,
    request: &DesignerRequest,
) -> Result<ProcessScheme, DomainError> {
    let code = scheme_code(request)?;
    engine
        .scheme_for_designer(code)
        .await
        .ok_or_else(|| DomainError::not_found(format!("Scheme '{}' is not found", code)))
}

/// Scheme body from the `data` field, else from the uploaded file
fn parse_upload(request: &DesignerRequest) -> Result<ProcessScheme, DomainError> {
    let body = match (request.parameters.get_non_blank("data"), &request.file) {
        (Some(data), _) => data.to_string(),
        (None, Some(file)) => String::from_utf8(file.to_vec())
            .map_err(|_| DomainError::validation("Uploaded scheme is not valid UTF-8"))?,
        (None, None) => {
            return Err(DomainError::validation(
                "Scheme body is required in 'data' or as an uploaded file",
            ));
        }
    };

    serde_json::from_str(&body)
        .map_err(|e| DomainError::validation(format!("Scheme is not valid JSON: {}", e)))
}

fn to_json(scheme: &ProcessScheme) -> Result<String, DomainError> {
    serde_json::to_string(scheme)
        .map_err(|e| DomainError::internal(format!("Failed to serialize scheme: {}", e)))
}

fn render_xml(scheme: &ProcessScheme) -> Result<String, DomainError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_scheme(&mut writer, scheme)
        .map_err(|e| DomainError::internal(format!("Failed to render scheme XML: {}", e)))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| DomainError::internal(format!("Scheme XML is not valid UTF-8: {}", e)))
}

fn write_scheme(writer: &mut Writer<Vec<u8>>, scheme: &ProcessScheme) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut process = BytesStart::new("Process");
    process.push_attribute(("Name", scheme.code.as_str()));
    writer.write_event(Event::Start(process))?;

    writer.write_event(Event::Start(BytesStart::new("Parameters")))?;
    for parameter in &scheme.parameters {
        let mut element = BytesStart::new("Parameter");
        element.push_attribute(("Name", parameter.name.as_str()));
        element.push_attribute(("Type", parameter.type_tag.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Parameters")))?;

    writer.write_event(Event::Start(BytesStart::new("Commands")))?;
    for command in &scheme.commands {
        let mut element = BytesStart::new("Command");
        element.push_attribute(("Name", command.name.as_str()));

        if command.parameters.is_empty() {
            writer.write_event(Event::Empty(element))?;
            continue;
        }

        writer.write_event(Event::Start(element))?;
        for parameter in &command.parameters {
            let mut input = BytesStart::new("InputParameter");
            input.push_attribute(("Name", parameter.name.as_str()));
            input.push_attribute(("Type", parameter.type_tag.as_str()));
            writer.write_event(Event::Empty(input))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Command")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Commands")))?;

    writer.write_event(Event::Start(BytesStart::new("Activities")))?;
    for state in &scheme.states {
        let mut element = BytesStart::new("Activity");
        element.push_attribute(("Name", state.name.as_str()));
        element.push_attribute(("State", state.name.as_str()));
        element.push_attribute(("IsInitial", if state.is_initial { "True" } else { "False" }));
        element.push_attribute(("IsForSetState", if state.allow_set { "True" } else { "False" }));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Activities")))?;

    writer.write_event(Event::Start(BytesStart::new("Transitions")))?;
    for transition in &scheme.transitions {
        let mut element = BytesStart::new("Transition");
        element.push_attribute(("From", transition.from.as_str()));
        element.push_attribute(("To", transition.to.as_str()));
        element.push_attribute(("Command", transition.command.as_str()));
        if let Some(condition) = &transition.condition {
            element.push_attribute(("Condition", condition.as_str()));
        }
        if let Some(action) = &transition.action {
            element.push_attribute(("Action", action.as_str()));
        }
        if !transition.actors.is_empty() {
            let actors = transition.actors.join(",");
            element.push_attribute(("Actors", actors.as_str()));
        }
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Transitions")))?;

    writer.write_event(Event::End(BytesEnd::new("Process")))?;
    Ok(())
}
