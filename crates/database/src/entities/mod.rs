pub mod cart;
pub mod cart_order;
pub mod cart_order_item;
pub mod category;
pub mod certificate;
pub mod completed_lesson;
pub mod country;
pub mod coupon;
pub mod coupon_user;
pub mod course;
pub mod enrolled_course;
pub mod note;
pub mod notification;
pub mod order_coupon;
pub mod order_item_coupon;
pub mod order_teacher;
pub mod question_answer;
pub mod question_answer_message;
pub mod review;
pub mod teacher;
pub mod user;
pub mod variant;
pub mod variant_item;
pub mod wishlist;
