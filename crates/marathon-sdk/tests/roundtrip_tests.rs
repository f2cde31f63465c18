//! Decode/encode tests against sample API responses.

use marathon_sdk::*;
use serde_json::{json, Value};

const V2_QUEUE: &str = include_str!("api-responses/v2-queue.json");

/// JSON equality ignoring object key order and integer/float spelling
/// (`16` and `16.0` compare equal).
fn json_semantically_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_semantically_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| json_semantically_eq(v, w)))
        }
        _ => a == b,
    }
}

#[test]
fn test_queue_struct_roundtrip() {
    // Sample from the Marathon API plus a pod based item; must survive decode
    // and re-encode without loss.
    let expected: Value = serde_json::from_str(V2_QUEUE).unwrap();

    let queue: Queue = serde_json::from_str(V2_QUEUE).unwrap();
    let actual = serde_json::to_value(&queue).unwrap();

    assert!(
        json_semantically_eq(&expected, &actual),
        "round trip changed the document:\n{}",
        serde_json::to_string_pretty(&actual).unwrap()
    );
}

#[test]
fn test_queue_struct_fields() {
    let queue: Queue = serde_json::from_str(V2_QUEUE).unwrap();
    assert_eq!(queue.len(), 2);

    let app_item = &queue.items[0];
    let app = app_item.application.as_ref().unwrap();
    assert_eq!(app.id, "/fake-app");
    assert_eq!(app.cpus(), Some(0.1));
    assert_eq!(app.cmd(), Some("sleep 30"));
    assert_eq!(app.extra["args"], Value::Null);
    assert_eq!(app.extra["killSelection"], "YOUNGEST_FIRST");
    assert!(app_item.role.is_none());

    let summary = app_item.processed_offers_summary.as_ref().unwrap();
    assert_eq!(summary.processed_offers_count, 2);
    assert!(summary.last_unused_offer_at.is_some());
    assert!(summary.last_used_offer_at.is_none());
    let last_offers = summary.reject_summary_last_offers.as_ref().unwrap();
    assert_eq!(last_offers.len(), 4);
    assert_eq!(last_offers[2].reason, "InsufficientCpus");
    assert_eq!(last_offers[2].declined, 2);

    let pod_item = &queue.items[1];
    assert!(matches!(pod_item.run_spec(), Some(QueuedRunSpec::Pod(_))));
    assert_eq!(pod_item.role.as_deref(), Some("slave_public"));
    assert_eq!(pod_item.pod.as_ref().unwrap().container_names(), vec!["web"]);
    assert!(pod_item.last_unused_offers.as_ref().unwrap().is_empty());
    assert!(pod_item
        .processed_offers_summary
        .as_ref()
        .unwrap()
        .reject_summary_launch_attempt
        .is_none());
}

#[test]
fn test_queue_keeps_unknown_item_fields() {
    let mut document: Value = serde_json::from_str(V2_QUEUE).unwrap();
    document["queue"][1]["launchPriority"] = json!({ "tier": "gold" });

    let queue: Queue = serde_json::from_value(document.clone()).unwrap();
    assert_eq!(queue.items[1].extra["launchPriority"]["tier"], "gold");
    assert!(json_semantically_eq(&document, &serde_json::to_value(&queue).unwrap()));
}

#[test]
fn test_queue_keeps_explicit_null_fields() {
    let mut document: Value = serde_json::from_str(V2_QUEUE).unwrap();
    document["queue"][0]["app"]["cmd"] = Value::Null;
    document["queue"][0]["app"]["instances"] = Value::Null;

    let queue: Queue = serde_json::from_value(document.clone()).unwrap();
    let app = queue.items[0].application.as_ref().unwrap();
    assert!(app.cmd().is_none());
    assert!(app.instances().is_none());

    let encoded = serde_json::to_value(&queue).unwrap();
    assert_eq!(encoded["queue"][0]["app"]["cmd"], Value::Null);
    assert!(json_semantically_eq(&document, &encoded));
}

#[test]
fn test_queue_keeps_unknown_nested_fields() {
    let mut document: Value = serde_json::from_str(V2_QUEUE).unwrap();
    let marker = json!({ "since": "1.15" });
    {
        let item = &mut document["queue"][0];
        item["delay"]["backoffReason"] = marker.clone();
        let summary = &mut item["processedOffersSummary"];
        summary["window"] = marker.clone();
        summary["rejectSummaryLastOffers"][0]["note"] = marker.clone();
        let unused = &mut item["lastUnusedOffers"][0];
        unused["origin"] = marker.clone();
        unused["offer"]["url"] = marker.clone();
        unused["offer"]["resources"][0]["reservation"] = marker.clone();
        unused["offer"]["attributes"] = json!([
            { "name": "rack", "scalar": 0, "set": ["r1"], "text": "r1" }
        ]);
    }
    document["queue"][0]["lastUnusedOffers"][0]["offer"]["resources"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "name": "ports",
            "scalar": 0,
            "ranges": [{ "begin": 31000, "end": 32000, "step": 1 }]
        }));

    let queue: Queue = serde_json::from_value(document.clone()).unwrap();
    let item = &queue.items[0];
    assert_eq!(item.delay.extra["backoffReason"], marker);
    let summary = item.processed_offers_summary.as_ref().unwrap();
    assert_eq!(summary.extra["window"], marker);
    assert_eq!(summary.reject_summary_last_offers.as_ref().unwrap()[0].extra["note"], marker);
    let unused = &item.last_unused_offers.as_ref().unwrap()[0];
    assert_eq!(unused.extra["origin"], marker);
    assert_eq!(unused.offer.extra["url"], marker);
    assert_eq!(unused.offer.resources()[0].extra["reservation"], marker);
    assert_eq!(unused.offer.attribute("rack").unwrap().extra["text"], "r1");
    let ports = unused.offer.resources().last().unwrap();
    assert_eq!(ports.ranges()[0].extra["step"], 1);

    assert!(
        json_semantically_eq(&document, &serde_json::to_value(&queue).unwrap()),
        "round trip dropped a nested field"
    );
}

#[test]
fn test_resource_without_ranges_or_set_roundtrips() {
    let mut document: Value = serde_json::from_str(V2_QUEUE).unwrap();
    document["queue"][0]["lastUnusedOffers"][0]["offer"]["resources"] =
        json!([{ "name": "mem", "scalar": 5823 }]);
    document["queue"][0]["lastUnusedOffers"][0]
        .as_object_mut()
        .unwrap()
        .remove("reason");

    let queue: Queue = serde_json::from_value(document.clone()).unwrap();
    let unused = &queue.items[0].last_unused_offers.as_ref().unwrap()[0];
    assert!(unused.reasons().is_empty());

    let encoded = serde_json::to_value(&queue).unwrap();
    let resource = &encoded["queue"][0]["lastUnusedOffers"][0]["offer"]["resources"][0];
    assert!(resource.get("ranges").is_none());
    assert!(resource.get("set").is_none());
    assert!(encoded["queue"][0]["lastUnusedOffers"][0].get("reason").is_none());
    assert!(json_semantically_eq(&document, &encoded));
}

#[test]
fn test_whole_second_timestamps_keep_their_instant() {
    // chrono drops an all-zero fraction on output, so `.000Z` comes back as
    // `Z`. The instant itself is unchanged.
    let mut document: Value = serde_json::from_str(V2_QUEUE).unwrap();
    document["queue"][0]["since"] = json!("2017-07-14T08:12:31.000Z");

    let queue: Queue = serde_json::from_value(document).unwrap();
    let encoded = serde_json::to_value(&queue).unwrap();
    let since = encoded["queue"][0]["since"].as_str().unwrap();
    assert_eq!(since, "2017-07-14T08:12:31Z");

    let reparsed: chrono::DateTime<chrono::Utc> = since.parse().unwrap();
    assert_eq!(reparsed, queue.items[0].since);
}
