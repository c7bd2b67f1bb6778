use serde_json::{Value, json};

/// Index holding one document per transcript line
pub const TRANSCRIPT_INDEX: &str = "the_magnus_archives_transcripts";

/// Index holding one summary document per episode
pub const EPISODE_INDEX: &str = "the_magnus_archives_episodes";

/// Saved object id of the imported dashboard
pub const DASHBOARD_ID: &str = "the-magnus-archives";

/// Kibana landing page once the dashboard has been imported
pub const DASHBOARD_ROUTE: &str = "/app/dashboards#/view/the-magnus-archives";

/// Settings for the transcripts index. A single sorted shard keeps
/// match-all scans in reading order without an explicit sort clause.
pub fn transcript_index_settings() -> Value {
    json!({
        "index": {
            "number_of_replicas": 0,
            "number_of_shards": 1,
            "sort": {
                "field": ["episode_number", "position"],
                "order": ["asc", "asc"]
            }
        }
    })
}

/// Field mappings for the transcripts index
pub fn transcript_index_mappings() -> Value {
    json!({
        "properties": {
            "season": { "type": "byte" },
            "episode_number": { "type": "short" },
            "episode_title": { "type": "text" },
            "filename": { "type": "text" },
            "content_warnings": { "type": "keyword" },
            "position": { "type": "short" },
            "type": { "type": "keyword" },
            "characters": { "type": "keyword" },
            "line": { "type": "text" }
        }
    })
}

/// Settings for the episodes index
pub fn episode_index_settings() -> Value {
    json!({
        "index": {
            "number_of_replicas": 0,
            "number_of_shards": 1
        }
    })
}

/// Field mappings for the episodes index
pub fn episode_index_mappings() -> Value {
    json!({
        "properties": {
            "season": { "type": "byte" },
            "episode_number": { "type": "short" },
            "episode_title": { "type": "text" },
            "filename": { "type": "text" },
            "content_warnings": { "type": "keyword" }
        }
    })
}

/// Saved-objects export for Kibana: the transcripts data view, two
/// visualizations over it and a dashboard tying them together. Rendered
/// as ndjson, one object per line, the format the import API expects.
pub fn dashboard_export() -> String {
    let data_view = json!({
        "type": "index-pattern",
        "id": TRANSCRIPT_INDEX,
        "attributes": {
            "title": TRANSCRIPT_INDEX,
            "fields": "[]"
        },
        "references": []
    });

    let lines_per_episode = json!({
        "type": "visualization",
        "id": "mag-lines-per-episode",
        "attributes": {
            "title": "Lines per episode",
            "uiStateJSON": "{}",
            "visState": json!({
                "title": "Lines per episode",
                "type": "histogram",
                "params": { "type": "histogram", "addTooltip": true, "addLegend": false },
                "aggs": [
                    { "id": "1", "enabled": true, "type": "count", "params": {}, "schema": "metric" },
                    {
                        "id": "2",
                        "enabled": true,
                        "type": "terms",
                        "params": { "field": "episode_number", "orderBy": "_key", "order": "asc", "size": 200 },
                        "schema": "segment"
                    }
                ]
            }).to_string(),
            "kibanaSavedObjectMeta": { "searchSourceJSON": search_source_json() }
        },
        "references": [
            {
                "id": TRANSCRIPT_INDEX,
                "name": "kibanaSavedObjectMeta.searchSourceJSON.index",
                "type": "index-pattern"
            }
        ]
    });

    let lines_by_character = json!({
        "type": "visualization",
        "id": "mag-lines-by-character",
        "attributes": {
            "title": "Lines by character",
            "uiStateJSON": "{}",
            "visState": json!({
                "title": "Lines by character",
                "type": "pie",
                "params": { "type": "pie", "addTooltip": true, "addLegend": true, "isDonut": true },
                "aggs": [
                    { "id": "1", "enabled": true, "type": "count", "params": {}, "schema": "metric" },
                    {
                        "id": "2",
                        "enabled": true,
                        "type": "terms",
                        "params": { "field": "characters", "orderBy": "1", "order": "desc", "size": 25 },
                        "schema": "segment"
                    }
                ]
            }).to_string(),
            "kibanaSavedObjectMeta": { "searchSourceJSON": search_source_json() }
        },
        "references": [
            {
                "id": TRANSCRIPT_INDEX,
                "name": "kibanaSavedObjectMeta.searchSourceJSON.index",
                "type": "index-pattern"
            }
        ]
    });

    let lines_by_type = json!({
        "type": "visualization",
        "id": "mag-lines-by-type",
        "attributes": {
            "title": "Lines by type",
            "uiStateJSON": "{}",
            "visState": json!({
                "title": "Lines by type",
                "type": "pie",
                "params": { "type": "pie", "addTooltip": true, "addLegend": true, "isDonut": false },
                "aggs": [
                    { "id": "1", "enabled": true, "type": "count", "params": {}, "schema": "metric" },
                    {
                        "id": "2",
                        "enabled": true,
                        "type": "terms",
                        "params": { "field": "type", "orderBy": "1", "order": "desc", "size": 3 },
                        "schema": "segment"
                    }
                ]
            }).to_string(),
            "kibanaSavedObjectMeta": { "searchSourceJSON": search_source_json() }
        },
        "references": [
            {
                "id": TRANSCRIPT_INDEX,
                "name": "kibanaSavedObjectMeta.searchSourceJSON.index",
                "type": "index-pattern"
            }
        ]
    });

    let dashboard = json!({
        "type": "dashboard",
        "id": DASHBOARD_ID,
        "attributes": {
            "title": "The Magnus Archives",
            "description": "Lines, characters and content warnings across all indexed transcripts",
            "hits": 0,
            "timeRestore": false,
            "optionsJSON": json!({
                "useMargins": true,
                "syncColors": false,
                "hidePanelTitles": false
            }).to_string(),
            "panelsJSON": json!([
                {
                    "version": "8.0.0",
                    "type": "visualization",
                    "gridData": { "x": 0, "y": 0, "w": 24, "h": 16, "i": "1" },
                    "panelIndex": "1",
                    "embeddableConfig": {},
                    "panelRefName": "panel_1"
                },
                {
                    "version": "8.0.0",
                    "type": "visualization",
                    "gridData": { "x": 24, "y": 0, "w": 12, "h": 16, "i": "2" },
                    "panelIndex": "2",
                    "embeddableConfig": {},
                    "panelRefName": "panel_2"
                },
                {
                    "version": "8.0.0",
                    "type": "visualization",
                    "gridData": { "x": 36, "y": 0, "w": 12, "h": 16, "i": "3" },
                    "panelIndex": "3",
                    "embeddableConfig": {},
                    "panelRefName": "panel_3"
                }
            ]).to_string(),
            "kibanaSavedObjectMeta": { "searchSourceJSON": search_source_json() }
        },
        "references": [
            { "id": "mag-lines-per-episode", "name": "panel_1", "type": "visualization" },
            { "id": "mag-lines-by-character", "name": "panel_2", "type": "visualization" },
            { "id": "mag-lines-by-type", "name": "panel_3", "type": "visualization" }
        ]
    });

    [
        data_view,
        lines_per_episode,
        lines_by_character,
        lines_by_type,
        dashboard,
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n")
}

fn search_source_json() -> String {
    json!({
        "query": { "query": "", "language": "kuery" },
        "filter": []
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_settings_sort_by_reading_order() {
        let settings = transcript_index_settings();
        assert_eq!(settings["index"]["number_of_shards"], 1);
        assert_eq!(
            settings["index"]["sort"]["field"],
            json!(["episode_number", "position"])
        );
    }

    #[test]
    fn test_transcript_mappings_cover_all_document_fields() {
        let mappings = transcript_index_mappings();
        let properties = mappings["properties"].as_object().unwrap();
        for field in [
            "season",
            "episode_number",
            "episode_title",
            "filename",
            "content_warnings",
            "position",
            "type",
            "characters",
            "line",
        ] {
            assert!(properties.contains_key(field), "missing mapping for {field}");
        }
        assert_eq!(mappings["properties"]["characters"]["type"], "keyword");
        assert_eq!(mappings["properties"]["line"]["type"], "text");
    }

    #[test]
    fn test_episode_mappings_have_no_line_fields() {
        let mappings = episode_index_mappings();
        let properties = mappings["properties"].as_object().unwrap();
        assert!(properties.contains_key("episode_title"));
        assert!(!properties.contains_key("line"));
        assert!(!properties.contains_key("position"));
    }

    #[test]
    fn test_dashboard_export_is_valid_ndjson() {
        let export = dashboard_export();
        let objects: Vec<Value> = export
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(objects.len(), 5);
        assert_eq!(objects[0]["type"], "index-pattern");
        assert_eq!(objects[0]["id"], TRANSCRIPT_INDEX);
        assert_eq!(objects[4]["type"], "dashboard");
        assert_eq!(objects[4]["id"], DASHBOARD_ID);
    }

    #[test]
    fn test_dashboard_references_every_panel() {
        let export = dashboard_export();
        let dashboard: Value = serde_json::from_str(export.lines().last().unwrap()).unwrap();
        let references = dashboard["references"].as_array().unwrap();
        assert_eq!(references.len(), 3);
        assert_eq!(references[0]["id"], "mag-lines-per-episode");
        assert_eq!(references[1]["id"], "mag-lines-by-character");
        assert_eq!(references[2]["id"], "mag-lines-by-type");
        // The embedded panel JSON must itself parse
        let panels: Value =
            serde_json::from_str(dashboard["attributes"]["panelsJSON"].as_str().unwrap()).unwrap();
        assert_eq!(panels.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_dashboard_route_points_at_dashboard() {
        assert!(DASHBOARD_ROUTE.starts_with("/app/dashboards"));
        assert!(DASHBOARD_ROUTE.ends_with(DASHBOARD_ID));
    }
}
