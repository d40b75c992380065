use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use sqlx::FromRow;
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{validate_length, ValidationError, ValidationErrors};

use crate::{
    models::user::SessionContext,
    utils::{
        errors::FormError,
        logger::StructuredLogger,
        phone::phone_rule,
    },
};

pub const TITLE_MAX_LEN: u64 = 100;

pub const ERR_TITLE_MSG: &str = "title too long";
pub const ERR_TIME_MSG: &str = "time must be at least later than now";
pub const ERR_REQUIRED_MSG: &str = "cannot be blank";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i32,
    pub title: String,
    pub start_time: i64,
    pub end_time: i64,
    pub government: String,
    pub career: String,
    pub is_auth: bool,
    pub auth_code: String,
    pub is_recorded: bool,
    pub candidate_name: String,
    pub candidate_phone: String,
    pub interviewer_name: String,
    pub interviewer_phone: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form submitted to create an interview. Missing fields bind to their zero
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterviewForm {
    pub title: String,
    #[serde(deserialize_with = "empty_as_zero")]
    pub start_time: i64,
    #[serde(deserialize_with = "empty_as_zero")]
    pub end_time: i64,
    pub government: String,
    pub career: String,
    pub is_auth: bool,
    pub auth_code: String,
    pub is_recorded: bool,
    pub candidate_name: String,
    pub candidate_phone: String,
    pub interviewer_name: String,
    pub interviewer_phone: String,
}

/// Blank form values bind to 0 so the required rule reports them.
fn empty_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Int(i64),
        Text(String),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Int(n) => Ok(n),
        RawTimestamp::Text(s) if s.trim().is_empty() => Ok(0),
        RawTimestamp::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Updates resubmit the whole form.
pub type InterviewUpdateForm = InterviewForm;

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(rule_error("required", ERR_REQUIRED_MSG));
    }
    if !validate_length(title, None, Some(TITLE_MAX_LEN), None) {
        return Err(rule_error("length", ERR_TITLE_MSG));
    }
    Ok(())
}

fn check_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Err(rule_error("required", ERR_REQUIRED_MSG));
    }
    phone_rule(phone).apply(phone)
}

fn check_time(timestamp: i64, now: i64) -> Result<(), ValidationError> {
    if timestamp == 0 {
        return Err(rule_error("required", ERR_REQUIRED_MSG));
    }
    if timestamp < now {
        let mut error = rule_error("min", ERR_TIME_MSG);
        error.add_param(Cow::Borrowed("min"), &now);
        return Err(error);
    }
    Ok(())
}

impl InterviewForm {
    /// Validates against the current wall-clock second.
    pub fn check(&self) -> Result<(), FormError> {
        self.check_at(Utc::now().timestamp())
    }

    /// Phone collision short-circuits; otherwise every field rule runs and
    /// the first failing field, in declaration order, names the error.
    pub fn check_at(&self, now: i64) -> Result<(), FormError> {
        if self.candidate_phone == self.interviewer_phone {
            return Err(FormError::PhoneCollision);
        }

        let checks = [
            ("title", check_title(&self.title)),
            ("interviewerPhone", check_phone(&self.interviewer_phone)),
            ("candidatePhone", check_phone(&self.candidate_phone)),
            ("startTime", check_time(self.start_time, now)),
            ("endTime", check_time(self.end_time, now)),
        ];

        let mut errors = ValidationErrors::new();
        let mut first: Option<(&'static str, String)> = None;

        for (field, result) in checks {
            if let Err(error) = result {
                if first.is_none() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    first = Some((field, message));
                }
                errors.add(field, error);
            }
        }

        match first {
            None => Ok(()),
            Some((field, message)) => Err(FormError::Invalid {
                field,
                message,
                errors,
            }),
        }
    }

    /// Fills empty interviewer fields from the session user. Fields the caller
    /// already set are left alone.
    pub fn fill_default<S>(&mut self, session: &S, logger: &StructuredLogger)
    where
        S: SessionContext + ?Sized,
    {
        let Some(user) = session.current_user() else {
            logger.log_note(
                "no session user in request context, interviewer defaults skipped",
                HashMap::new(),
            );
            return;
        };

        if self.interviewer_name.is_empty() {
            self.interviewer_name = user.nickname.clone();
        }
        if self.interviewer_phone.is_empty() {
            self.interviewer_phone = user.phone.clone();
        }
    }

    /// Field key to value mapping used for partial updates. Every key is
    /// always present.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("title".into(), json!(self.title));
        map.insert("startTime".into(), json!(self.start_time));
        map.insert("endTime".into(), json!(self.end_time));
        map.insert("government".into(), json!(self.government));
        map.insert("career".into(), json!(self.career));
        map.insert("isAuth".into(), json!(self.is_auth));
        map.insert("authCode".into(), json!(self.auth_code));
        map.insert("isRecorded".into(), json!(self.is_recorded));
        map.insert("candidateName".into(), json!(self.candidate_name));
        map.insert("candidatePhone".into(), json!(self.candidate_phone));
        map.insert("interviewerName".into(), json!(self.interviewer_name));
        map.insert("interviewerPhone".into(), json!(self.interviewer_phone));
        map
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub id: i32,
    pub title: String,
    pub start_time: i64,
    pub end_time: i64,
    pub government: String,
    pub career: String,
    pub is_auth: bool,
    pub is_recorded: bool,
    pub candidate_name: String,
    pub candidate_phone: String,
    pub interviewer_name: String,
    pub interviewer_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            title: interview.title,
            start_time: interview.start_time,
            end_time: interview.end_time,
            government: interview.government,
            career: interview.career,
            is_auth: interview.is_auth,
            is_recorded: interview.is_recorded,
            candidate_name: interview.candidate_name,
            candidate_phone: interview.candidate_phone,
            interviewer_name: interview.interviewer_name,
            interviewer_phone: interview.interviewer_phone,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}
