//! Builds per-recipient notices from validated request fields.
//!
//! Composition is pure: attachment bytes and links are handed in by the
//! caller, so nothing here touches the filesystem or the network.

use notification::{AttachmentPayload, OutboundMessage};

use super::error::{Error, Result};
use crate::entity::{ClassBroadcast, ClassInvite, LecturePacket, QuizNotice, Recipient};

/// Material accompanying a lecture notice, prepared by the caller.
#[derive(Debug)]
pub enum LectureMaterial {
    None,
    /// Link appended to the body.
    Link(String),
    /// File content attached to the message.
    File(AttachmentPayload),
}

/// Builds the quiz notice addressed to a single student contact.
///
/// # Errors
///
/// Returns an error if a required field is empty.
pub fn quiz_notice(notice: &QuizNotice) -> Result<OutboundMessage> {
    ensure("teacher_name", &notice.teacher_name)?;
    ensure("quiz_code", &notice.quiz_code)?;
    ensure("student_email", &notice.student_email)?;

    let subject = format!("Regarding Quiz {}", notice.quiz_code);
    let body = format!(
        "Hello {},\n\nThis is a notification regarding Quiz {}. Please reach out to {} for \
         further details.",
        notice.teacher_name, notice.quiz_code, notice.student_email
    );

    Ok(OutboundMessage { to: notice.student_email.clone(), subject, body, attachment: None })
}

/// Builds the broadcast notice for one resolved class member.
///
/// # Errors
///
/// Returns an error if a required field is empty.
pub fn broadcast_notice(
    broadcast: &ClassBroadcast,
    recipient: &Recipient,
) -> Result<OutboundMessage> {
    ensure("teacher_name", &broadcast.teacher_name)?;
    ensure("teacher_email", &broadcast.teacher_email)?;
    ensure("class_name", &broadcast.class_name)?;
    ensure("quiz_name", &broadcast.quiz_name)?;
    ensure("quiz_code", &broadcast.quiz_code)?;

    let subject = format!("New quiz {} for {}", broadcast.quiz_name, broadcast.class_name);
    let body = format!(
        "Hello {},\n\nThe quiz \"{}\" (id {}, code {}) has been assigned to your class {}.\n\nIf \
         you have any questions, contact {} at {}.",
        recipient.full_name,
        broadcast.quiz_name,
        broadcast.quiz_id,
        broadcast.quiz_code,
        broadcast.class_name,
        broadcast.teacher_name,
        broadcast.teacher_email
    );

    Ok(OutboundMessage { to: recipient.email.clone(), subject, body, attachment: None })
}

/// Builds the class invitation for a single student.
///
/// # Errors
///
/// Returns an error if a required field is empty. The access code changes
/// the meaning of the message, so an empty one is rejected instead of being
/// interpolated away.
pub fn invite_notice(invite: &ClassInvite) -> Result<OutboundMessage> {
    ensure("student_email", &invite.student_email)?;
    ensure("teacher_name", &invite.teacher_name)?;
    ensure("teacher_email", &invite.teacher_email)?;
    ensure("class_title", &invite.class_title)?;
    ensure("access_code", &invite.access_code)?;

    let subject = format!("Invitation to join {}", invite.class_title);
    let body = format!(
        "Hello,\n\nYou have been invited by {} ({}) to join the class \"{}\".\n\nUse access code \
         {} to join.",
        invite.teacher_name, invite.teacher_email, invite.class_title, invite.access_code
    );

    Ok(OutboundMessage { to: invite.student_email.clone(), subject, body, attachment: None })
}

/// Builds the lecture notice with its accompanying material.
///
/// # Errors
///
/// Returns an error if a required field is empty.
pub fn lecture_notice(
    packet: &LecturePacket,
    material: LectureMaterial,
) -> Result<OutboundMessage> {
    ensure("teacher_name", &packet.teacher_name)?;
    ensure("teacher_email", &packet.teacher_email)?;
    ensure("quiz_name", &packet.quiz_name)?;
    ensure("student_name", &packet.student_name)?;
    ensure("student_email", &packet.student_email)?;
    ensure("body", &packet.body)?;

    let subject = format!("Lecture materials for {}", packet.quiz_name);
    let mut body = format!(
        "Hello {},\n\n{}\n\nRegards,\n{} ({})",
        packet.student_name, packet.body, packet.teacher_name, packet.teacher_email
    );

    let attachment = match material {
        LectureMaterial::None => None,
        LectureMaterial::Link(url) => {
            body.push_str(&format!("\n\nMaterials: {url}"));
            None
        }
        LectureMaterial::File(payload) => Some(payload),
    };

    Ok(OutboundMessage { to: packet.student_email.clone(), subject, body, attachment })
}

fn ensure(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_notice_wire_text() {
        let notice = QuizNotice {
            teacher_name: "Alice".to_string(),
            quiz_code: "Q42".to_string(),
            student_email: "s@ex.com".to_string(),
        };

        let outbound = quiz_notice(&notice).unwrap();

        assert_eq!(outbound.to, "s@ex.com");
        assert_eq!(outbound.subject, "Regarding Quiz Q42");
        assert_eq!(
            outbound.body,
            "Hello Alice,\n\nThis is a notification regarding Quiz Q42. Please reach out to \
             s@ex.com for further details."
        );
        assert!(outbound.attachment.is_none());
    }

    #[test]
    fn test_invite_rejects_empty_access_code() {
        let invite = ClassInvite {
            student_email: "student@example.com".to_string(),
            teacher_name: "Alice".to_string(),
            teacher_email: "alice@example.edu".to_string(),
            class_title: "Physics 101".to_string(),
            access_code: String::new(),
        };

        let err = invite_notice(&invite).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "access_code" }));
    }

    #[test]
    fn test_lecture_notice_embeds_link() {
        let packet = LecturePacket {
            teacher_name: "Alice".to_string(),
            teacher_email: "alice@example.edu".to_string(),
            quiz_name: "Midterm review".to_string(),
            student_name: "Jordan Lee".to_string(),
            student_email: "student@example.com".to_string(),
            body: "Please review chapters 4 and 5.".to_string(),
            attachment_ref: None,
        };

        let outbound = lecture_notice(
            &packet,
            LectureMaterial::Link("https://files.example.edu/lecture-04.pdf".to_string()),
        )
        .unwrap();

        assert_eq!(outbound.subject, "Lecture materials for Midterm review");
        assert!(outbound.body.contains("Materials: https://files.example.edu/lecture-04.pdf"));
        assert!(outbound.attachment.is_none());
    }

    #[test]
    fn test_lecture_notice_carries_file_payload() {
        let packet = LecturePacket {
            teacher_name: "Alice".to_string(),
            teacher_email: "alice@example.edu".to_string(),
            quiz_name: "Midterm review".to_string(),
            student_name: "Jordan Lee".to_string(),
            student_email: "student@example.com".to_string(),
            body: "Notes attached.".to_string(),
            attachment_ref: Some("notes.pdf".to_string()),
        };

        let payload =
            AttachmentPayload { filename: "notes.pdf".to_string(), content: b"%PDF-1.4".to_vec() };

        let outbound = lecture_notice(&packet, LectureMaterial::File(payload)).unwrap();

        let attachment = outbound.attachment.unwrap();
        assert_eq!(attachment.filename, "notes.pdf");
        assert_eq!(attachment.content, b"%PDF-1.4");
    }
}
