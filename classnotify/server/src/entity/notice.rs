use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::error::{Error, Result};

/// Request to send a quiz notice to a single student contact
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizNoticeRequest {
    /// Name of the teacher the notice is written for
    #[schema(example = "Alice")]
    pub teacher_name: Option<String>,

    /// Code of the quiz the notice refers to
    #[schema(example = "Q42")]
    pub quiz_code: Option<String>,

    /// Student contact address
    #[schema(example = "student@example.com")]
    pub student_email: Option<String>,
}

/// Validated quiz notice fields
#[derive(Debug, Clone)]
pub struct QuizNotice {
    pub teacher_name: String,
    pub quiz_code: String,
    pub student_email: String,
}

impl QuizNoticeRequest {
    /// Rejects the request before any side-effecting work starts.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing required field.
    pub fn validate(self) -> Result<QuizNotice> {
        Ok(QuizNotice {
            teacher_name: require("teacher_name", self.teacher_name)?,
            quiz_code: require("quiz_code", self.quiz_code)?,
            student_email: require("student_email", self.student_email)?,
        })
    }
}

/// Request to notify every student enrolled in a class about a new quiz
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassBroadcastRequest {
    #[schema(example = "Alice")]
    pub teacher_name: Option<String>,

    #[schema(example = "alice@example.edu")]
    pub teacher_email: Option<String>,

    #[schema(example = "Physics 101")]
    pub class_name: Option<String>,

    /// Identifier of the class whose roster is resolved
    #[schema(example = "phy-101-a")]
    pub class_id: Option<String>,

    #[schema(example = "7f3c9d")]
    pub quiz_id: Option<String>,

    #[schema(example = "Midterm review")]
    pub quiz_name: Option<String>,

    #[schema(example = "Q42")]
    pub quiz_code: Option<String>,
}

/// Validated class broadcast fields
#[derive(Debug, Clone)]
pub struct ClassBroadcast {
    pub teacher_name: String,
    pub teacher_email: String,
    pub class_name: String,
    pub class_id: String,
    pub quiz_id: String,
    pub quiz_name: String,
    pub quiz_code: String,
}

impl ClassBroadcastRequest {
    /// # Errors
    ///
    /// Returns an error naming the first missing required field.
    pub fn validate(self) -> Result<ClassBroadcast> {
        Ok(ClassBroadcast {
            teacher_name: require("teacher_name", self.teacher_name)?,
            teacher_email: require("teacher_email", self.teacher_email)?,
            class_name: require("class_name", self.class_name)?,
            class_id: require("class_id", self.class_id)?,
            quiz_id: require("quiz_id", self.quiz_id)?,
            quiz_name: require("quiz_name", self.quiz_name)?,
            quiz_code: require("quiz_code", self.quiz_code)?,
        })
    }
}

/// Request to invite a student into a class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassInviteRequest {
    #[schema(example = "student@example.com")]
    pub student_email: Option<String>,

    #[schema(example = "Alice")]
    pub teacher_name: Option<String>,

    #[schema(example = "alice@example.edu")]
    pub teacher_email: Option<String>,

    #[schema(example = "Physics 101")]
    pub class_title: Option<String>,

    /// Code the student uses to join the class
    #[schema(example = "JOIN-2481")]
    pub access_code: Option<String>,
}

/// Validated class invite fields
#[derive(Debug, Clone)]
pub struct ClassInvite {
    pub student_email: String,
    pub teacher_name: String,
    pub teacher_email: String,
    pub class_title: String,
    pub access_code: String,
}

impl ClassInviteRequest {
    /// # Errors
    ///
    /// Returns an error naming the first missing required field.
    pub fn validate(self) -> Result<ClassInvite> {
        Ok(ClassInvite {
            student_email: require("student_email", self.student_email)?,
            teacher_name: require("teacher_name", self.teacher_name)?,
            teacher_email: require("teacher_email", self.teacher_email)?,
            class_title: require("class_title", self.class_title)?,
            access_code: require("access_code", self.access_code)?,
        })
    }
}

/// Request to deliver lecture materials to a single student
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LecturePacketRequest {
    #[schema(example = "Alice")]
    pub teacher_name: Option<String>,

    #[schema(example = "alice@example.edu")]
    pub teacher_email: Option<String>,

    #[schema(example = "Midterm review")]
    pub quiz_name: Option<String>,

    #[schema(example = "Jordan Lee")]
    pub student_name: Option<String>,

    #[schema(example = "student@example.com")]
    pub student_email: Option<String>,

    /// Free-text message body
    #[schema(example = "Please review chapters 4 and 5 before the quiz.")]
    pub body: Option<String>,

    /// Optional attachment: a local file path or an http(s) link
    #[schema(example = "https://files.example.edu/lecture-04.pdf")]
    pub attachment: Option<String>,
}

/// Validated lecture packet fields
#[derive(Debug, Clone)]
pub struct LecturePacket {
    pub teacher_name: String,
    pub teacher_email: String,
    pub quiz_name: String,
    pub student_name: String,
    pub student_email: String,
    pub body: String,
    pub attachment_ref: Option<String>,
}

impl LecturePacketRequest {
    /// # Errors
    ///
    /// Returns an error naming the first missing required field. The
    /// attachment reference stays optional; it is judged later by admission.
    pub fn validate(self) -> Result<LecturePacket> {
        Ok(LecturePacket {
            teacher_name: require("teacher_name", self.teacher_name)?,
            teacher_email: require("teacher_email", self.teacher_email)?,
            quiz_name: require("quiz_name", self.quiz_name)?,
            student_name: require("student_name", self.student_name)?,
            student_email: require("student_email", self.student_email)?,
            body: require("body", self.body)?,
            attachment_ref: self.attachment,
        })
    }
}

fn require(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingField { field }),
    }
}

/// Acknowledgement for a single delivered notice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendReceipt {
    /// Human-readable confirmation
    #[schema(example = "Email sent successfully")]
    pub message: String,
}

impl SendReceipt {
    #[must_use]
    pub fn delivered() -> Self { Self { message: "Email sent successfully".to_string() } }
}

/// Aggregate outcome of one class-wide batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispatchReport {
    /// Number of recipients the batch attempted
    pub attempted: usize,

    /// Number of notices the transport accepted
    pub succeeded: usize,

    /// Recipients the batch could not deliver to
    pub failures: Vec<DeliveryFailure>,
}

/// One recipient the batch failed to deliver to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryFailure {
    /// Address of the failed recipient
    #[schema(example = "student@example.com")]
    pub recipient: String,

    /// Human-readable failure reason
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_request() -> QuizNoticeRequest {
        QuizNoticeRequest {
            teacher_name: Some("Alice".to_string()),
            quiz_code: Some("Q42".to_string()),
            student_email: Some("s@ex.com".to_string()),
        }
    }

    #[test]
    fn test_quiz_notice_validate() {
        let notice = quiz_request().validate().unwrap();

        assert_eq!(notice.teacher_name, "Alice");
        assert_eq!(notice.quiz_code, "Q42");
        assert_eq!(notice.student_email, "s@ex.com");
    }

    #[test]
    fn test_quiz_notice_missing_field() {
        let mut request = quiz_request();
        request.quiz_code = None;

        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "quiz_code" }));
    }

    #[test]
    fn test_quiz_notice_blank_field_is_missing() {
        let mut request = quiz_request();
        request.teacher_name = Some("   ".to_string());

        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "teacher_name" }));
    }

    #[test]
    fn test_broadcast_missing_class_id() {
        let request = ClassBroadcastRequest {
            teacher_name: Some("Alice".to_string()),
            teacher_email: Some("alice@example.edu".to_string()),
            class_name: Some("Physics 101".to_string()),
            class_id: None,
            quiz_id: Some("7f3c9d".to_string()),
            quiz_name: Some("Midterm review".to_string()),
            quiz_code: Some("Q42".to_string()),
        };

        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "class_id" }));
    }

    #[test]
    fn test_invite_missing_access_code() {
        let request = ClassInviteRequest {
            student_email: Some("student@example.com".to_string()),
            teacher_name: Some("Alice".to_string()),
            teacher_email: Some("alice@example.edu".to_string()),
            class_title: Some("Physics 101".to_string()),
            access_code: None,
        };

        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "access_code" }));
    }

    #[test]
    fn test_lecture_packet_attachment_stays_optional() {
        let request = LecturePacketRequest {
            teacher_name: Some("Alice".to_string()),
            teacher_email: Some("alice@example.edu".to_string()),
            quiz_name: Some("Midterm review".to_string()),
            student_name: Some("Jordan Lee".to_string()),
            student_email: Some("student@example.com".to_string()),
            body: Some("See you in class.".to_string()),
            attachment: None,
        };

        let packet = request.validate().unwrap();
        assert!(packet.attachment_ref.is_none());
    }
}
