//! Scene hooks with patches beyond the shared entity rules.

use chrono::{SecondsFormat, Utc};
use serde_json::{Number, Value};
use stash_schema::documents::{FIND_SCENE, FIND_SCENES, STATS};
use stash_schema::{EntityFamily, Typename};
use stash_store::{FieldUpdate, ObjectRef};

use super::{payload_ref, UpdateCx};
use crate::evict::{self, add_number};
use crate::impact::impact_table;

/// Files handed to a new scene leave their previous owner, so every other
/// scene's `files` list is dropped as well.
pub(super) fn create(cx: &mut UpdateCx<'_>, payload: &Value, file_ids: &[String]) {
    let table = impact_table(EntityFamily::Scene);
    if let Some(stat) = table.created_stat {
        evict::update_stats(cx.cache, stat, 1.0);
    }

    if file_ids.is_empty() {
        cx.evict_type_fields(&table.type_fields(), None);
    } else {
        let created = payload_ref(Typename::Scene, payload);
        let fields = table.type_fields().with(Typename::Scene, &["files"]);
        cx.evict_type_fields(&fields, created.as_ref());
    }
    cx.evict_queries(table.create_queries());
}

pub(super) fn assign_file(cx: &mut UpdateCx<'_>, scene_id: &str) {
    cx.cache.evict_object(&ObjectRef::new(Typename::Scene, scene_id));

    let fields = evict::TypeFields::new().with(Typename::Scene, &["files"]);
    cx.evict_type_fields(&fields, None);
    cx.evict_queries(&[FIND_SCENES]);
}

/// Sources are gone; the destination was rewritten from the payload.
pub(super) fn merge(cx: &mut UpdateCx<'_>, source: &[String]) {
    let table = impact_table(EntityFamily::Scene);
    cx.delete_objects(Typename::Scene, source, Some(&FIND_SCENE));

    cx.evict_type_fields(&table.type_fields(), None);
    let mut queries = table.queries.to_vec();
    queries.push(STATS);
    cx.evict_queries(&queries);
}

pub(super) fn save_activity(
    cx: &mut UpdateCx<'_>,
    id: &str,
    resume_time: Option<f64>,
    play_duration: Option<f64>,
) {
    let scene = ObjectRef::new(Typename::Scene, id);

    if let Some(resume) = resume_time.and_then(Number::from_f64) {
        cx.cache
            .modify_field(&scene, "resume_time", |_| FieldUpdate::Set(Value::Number(resume)));
    }
    if let Some(duration) = play_duration {
        cx.cache.modify_field(&scene, "play_duration", |current| {
            match add_number(current, duration) {
                Some(next) => FieldUpdate::Set(next),
                None => FieldUpdate::Keep,
            }
        });
        if duration > 0.0 {
            evict::update_stats(cx.cache, "total_play_duration", duration);
        }
    }

    cx.evict_queries(&[FIND_SCENES]);
}

/// `scenes_played` only moves on a scene's first play. When the previous
/// count is unknown the stat is dropped instead of guessed.
pub(super) fn increment_play_count(cx: &mut UpdateCx<'_>, id: &str) {
    let scene = ObjectRef::new(Typename::Scene, id);

    let mut previous = None;
    cx.cache.modify_field(&scene, "play_count", |current| {
        let count = if current.is_null() { Some(0) } else { current.as_i64() };
        previous = count;
        match count {
            Some(count) => FieldUpdate::Set(Value::from(count + 1)),
            None => FieldUpdate::Keep,
        }
    });
    // approximate; the server sets the real timestamp
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    cx.cache
        .modify_field(&scene, "last_played_at", |_| FieldUpdate::Set(Value::String(now)));

    evict::update_stats(cx.cache, "total_play_count", 1.0);
    match previous {
        Some(0) => {
            evict::update_stats(cx.cache, "scenes_played", 1.0);
        }
        Some(_) => {}
        None => {
            evict::unresolve_stat(cx.cache, "scenes_played");
        }
    }

    cx.evict_queries(&[FIND_SCENES]);
}
