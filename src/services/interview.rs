use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::interview::{Interview, InterviewForm};

/// Form key to column. Keys missing from this table are never written.
const COLUMNS: &[(&str, &str)] = &[
    ("title", "title"),
    ("startTime", "start_time"),
    ("endTime", "end_time"),
    ("government", "government"),
    ("career", "career"),
    ("isAuth", "is_auth"),
    ("authCode", "auth_code"),
    ("isRecorded", "is_recorded"),
    ("candidateName", "candidate_name"),
    ("candidatePhone", "candidate_phone"),
    ("interviewerName", "interviewer_name"),
    ("interviewerPhone", "interviewer_phone"),
];

pub struct InterviewService {
    pub db: PgPool,
}

/// Appends `column = $n` assignments for every known key present in
/// `fields`. Returns how many were written.
fn push_assignments(
    builder: &mut QueryBuilder<'_, Postgres>,
    fields: &Map<String, Value>,
) -> usize {
    let mut written = 0;
    let mut set = builder.separated(", ");

    for (key, column) in COLUMNS {
        let Some(value) = fields.get(*key) else {
            continue;
        };

        match value {
            Value::String(s) => {
                set.push(format!("{} = ", column));
                set.push_bind_unseparated(s.clone());
            }
            Value::Bool(b) => {
                set.push(format!("{} = ", column));
                set.push_bind_unseparated(*b);
            }
            Value::Number(n) => match n.as_i64() {
                Some(n) => {
                    set.push(format!("{} = ", column));
                    set.push_bind_unseparated(n);
                }
                None => {
                    tracing::warn!("Skipping non-integer value for {}", key);
                    continue;
                }
            },
            _ => {
                tracing::warn!("Skipping unsupported value for {}", key);
                continue;
            }
        }
        written += 1;
    }

    set.push("updated_at = NOW()");
    written
}

impl InterviewService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, form: &InterviewForm, created_by: i32) -> Result<Interview, sqlx::Error> {
        sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (
                title, start_time, end_time, government, career, is_auth, auth_code,
                is_recorded, candidate_name, candidate_phone, interviewer_name,
                interviewer_phone, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&form.title)
        .bind(form.start_time)
        .bind(form.end_time)
        .bind(&form.government)
        .bind(&form.career)
        .bind(form.is_auth)
        .bind(&form.auth_code)
        .bind(form.is_recorded)
        .bind(&form.candidate_name)
        .bind(&form.candidate_phone)
        .bind(&form.interviewer_name)
        .bind(&form.interviewer_phone)
        .bind(created_by)
        .fetch_one(&self.db)
        .await
    }

    /// Sets the columns named by `fields` on an interview owned by `owner`.
    pub async fn update_fields(
        &self,
        id: i32,
        owner: i32,
        fields: &Map<String, Value>,
    ) -> Result<Interview, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE interviews SET ");
        let written = push_assignments(&mut builder, fields);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND created_by = ")
            .push_bind(owner)
            .push(" RETURNING *");

        tracing::debug!("Updating interview {} with {} fields", id, written);

        builder
            .build_query_as::<Interview>()
            .fetch_one(&self.db)
            .await
    }

    pub async fn find(&self, id: i32, owner: i32) -> Result<Interview, sqlx::Error> {
        sqlx::query_as::<_, Interview>(
            "SELECT * FROM interviews WHERE id = $1 AND created_by = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(&self.db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(fields: &Map<String, Value>) -> (String, usize) {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE interviews SET ");
        let written = push_assignments(&mut builder, fields);
        (builder.sql().to_string(), written)
    }

    #[test]
    fn full_form_sets_every_column() {
        let form = InterviewForm {
            title: "Backend".to_string(),
            start_time: 10,
            end_time: 20,
            ..Default::default()
        };
        let (sql, written) = render(&form.to_map());

        assert_eq!(written, COLUMNS.len());
        for (_, column) in COLUMNS {
            assert!(sql.contains(&format!("{} = $", column)), "{} missing in {}", column, sql);
        }
        assert!(sql.ends_with("updated_at = NOW()"));
    }

    #[test]
    fn only_present_keys_are_written() {
        let mut fields = Map::new();
        fields.insert("title".into(), json!("Renamed"));
        fields.insert("isRecorded".into(), json!(true));
        fields.insert("unknown".into(), json!("ignored"));

        let (sql, written) = render(&fields);

        assert_eq!(written, 2);
        assert_eq!(
            sql,
            "UPDATE interviews SET title = $1, is_recorded = $2, updated_at = NOW()"
        );
    }

    #[test]
    fn unsupported_values_are_skipped() {
        let mut fields = Map::new();
        fields.insert("title".into(), Value::Null);
        fields.insert("startTime".into(), json!(1.5));

        let (sql, written) = render(&fields);

        assert_eq!(written, 0);
        assert_eq!(sql, "UPDATE interviews SET updated_at = NOW()");
    }
}
