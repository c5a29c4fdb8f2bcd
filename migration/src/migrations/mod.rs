pub mod m202512240001_create_users;
pub mod m202512240002_create_courses;
pub mod m202512240003_create_students;
pub mod m202512240004_create_student_sessions;
pub mod m202512240005_create_announcements;
pub mod m202512240006_create_exams;
pub mod m202512240007_create_exam_sessions;
pub mod m202512240008_create_commands;
pub mod m202512240009_create_activity_logs;
