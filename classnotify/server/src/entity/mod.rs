mod notice;
mod recipient;

pub use self::{
    notice::{
        ClassBroadcast, ClassBroadcastRequest, ClassInvite, ClassInviteRequest, DeliveryFailure,
        DispatchReport, LecturePacket, LecturePacketRequest, QuizNotice, QuizNoticeRequest,
        SendReceipt,
    },
    recipient::Recipient,
};
