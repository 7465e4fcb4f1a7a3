mod comments;
mod likes;
mod threads;
