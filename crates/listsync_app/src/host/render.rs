use listsync_core::{Entity, ListViewModel, LoadPhase};

/// One status line summarizing the list.
pub fn render_status(view: &ListViewModel) -> String {
    let phase = match view.phase {
        LoadPhase::Idle => "idle",
        LoadPhase::LoadingInitial => "loading",
        LoadPhase::LoadingMore => "loading more",
        LoadPhase::Exhausted => "all loaded",
    };

    let mut filters = Vec::new();
    if let Some(ordering) = &view.query.ordering {
        filters.push(format!("ordering={ordering}"));
    }
    if let Some(search) = &view.query.search {
        filters.push(format!("search={search:?}"));
    }
    if let Some(process) = &view.query.process {
        filters.push(format!("process={}", process.process_id));
    }
    let filters = if filters.is_empty() {
        String::new()
    } else {
        format!(" ({})", filters.join(", "))
    };

    let mut line = format!(
        "{}{} | {} of {} loaded | {}",
        view.query.base_endpoint,
        filters,
        format_with_commas(view.loaded_count() as u64),
        format_with_commas(view.total_count),
        phase
    );
    if let Some(error) = &view.last_error {
        line.push_str(&format!(" | error: {error}"));
    }
    line
}

/// Every loaded entity, one per line, numbered in arrival order.
pub fn render_entities(view: &ListViewModel) -> Vec<String> {
    view.entities
        .iter()
        .enumerate()
        .map(|(index, entity)| format!("{:>5}  {}", index + 1, entity_summary(entity)))
        .collect()
}

fn entity_summary(entity: &Entity) -> String {
    let label = ["name", "title", "serial_number", "code"]
        .iter()
        .find_map(|key| entity.value().get(key).and_then(|v| v.as_str()));
    match (entity.id(), label) {
        (Some(id), Some(label)) => format!("#{id} {label}"),
        (Some(id), None) => format!("#{id}"),
        (None, Some(label)) => label.to_string(),
        (None, None) => entity.value().to_string(),
    }
}

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
