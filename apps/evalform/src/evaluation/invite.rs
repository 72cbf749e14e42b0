use thiserror::Error;

use crate::models::candidate::CandidateInfo;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InviteError {
    #[error("Please fill in candidate name and mobile number first.")]
    MissingContact,
}

/// Where the invite points and what it links to.
#[derive(Debug, Clone)]
pub struct InviteTemplate {
    pub base_url: String,
    pub location_url: String,
}

/// Strips whitespace and makes sure the number carries a leading `+`.
pub fn normalize_phone(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.starts_with('+') {
        compact
    } else {
        format!("+{compact}")
    }
}

fn invite_message(candidate: &CandidateInfo, location_url: &str) -> String {
    format!(
        "Hi {name}\n\n\
         Thank you for attending the first round of interviews with us. \
         We’re pleased to invite you for a second round of face to face interview \
         for the {position} role.\n\n\
         📅 Date: {date}\n\
         ⏰ Time: {time}\n\
         📍 Link: {location_url}\n\n\
         Kindly confirm your availability for the above schedule.",
        name = candidate.name,
        position = candidate.position,
        date = candidate.date,
        time = candidate.time,
    )
}

/// Builds `<base>/<digits>?text=<message>` for the second-round invitation.
/// The messaging service takes the number without its `+`.
pub fn invite_url(
    candidate: &CandidateInfo,
    template: &InviteTemplate,
) -> Result<String, InviteError> {
    if candidate.name.trim().is_empty() || candidate.mobile.trim().is_empty() {
        return Err(InviteError::MissingContact);
    }

    let phone = normalize_phone(&candidate.mobile);
    let message = invite_message(candidate, &template.location_url);

    Ok(format!(
        "{}/{}?text={}",
        template.base_url.trim_end_matches('/'),
        phone.trim_start_matches('+'),
        urlencoding::encode(&message)
    ))
}
