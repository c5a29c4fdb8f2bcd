pub mod activity_log;
pub mod announcement;
pub mod command;
pub mod course;
pub mod exam;
pub mod exam_session;
pub mod student;
pub mod student_session;
pub mod user;

pub use activity_log::Entity as ActivityLog;
pub use announcement::Entity as Announcement;
pub use command::Entity as Command;
pub use course::Entity as Course;
pub use exam::Entity as Exam;
pub use exam_session::Entity as ExamSession;
pub use student::Entity as Student;
pub use student_session::Entity as StudentSession;
pub use user::Entity as User;
