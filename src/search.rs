use crate::data::User;

/// Case-insensitive substring match on first or last name.
pub fn matches(user: &User, query: &str) -> bool {
    let q = query.to_lowercase();
    user.first.to_lowercase().contains(&q) || user.last.to_lowercase().contains(&q)
}

/// Users matching `query`, in collection order. An empty query keeps everyone.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    if query.is_empty() {
        return users.iter().collect();
    }
    users.iter().filter(|u| matches(u, query)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::Gender;

	fn mk_user(id: u32, first: &str, last: &str) -> User {
		User {
			id,
			first: first.to_string(),
			last: last.to_string(),
			picture: String::new(),
			dob: "1990-01-01".to_string(),
			age: 36,
			gender: Gender::Other,
			country: "Nowhere".to_string(),
			description: String::new(),
		}
	}

	#[test]
	fn search_matches_first_name_in_any_case() {
		let users = vec![mk_user(1, "Alice", "Smith"), mk_user(2, "Bob", "Jones")];
		for q in ["ali", "ALI", "Ali", "aLi"] {
			let hits = filter_users(&users, q);
			assert_eq!(hits.len(), 1, "query {q}");
			assert_eq!(hits[0].id, 1);
		}
	}

	#[test]
	fn search_matches_last_name_and_keeps_order() {
		let users = vec![
			mk_user(1, "Zoe", "Hart"),
			mk_user(2, "Bob", "Jones"),
			mk_user(3, "Art", "Harper"),
		];
		let hits: Vec<u32> = filter_users(&users, "har").iter().map(|u| u.id).collect();
		assert_eq!(hits, vec![1, 3]);
	}

	#[test]
	fn empty_query_returns_everyone() {
		let users = vec![mk_user(1, "Alice", "Smith"), mk_user(2, "Bob", "Jones")];
		assert_eq!(filter_users(&users, "").len(), 2);
		assert!(filter_users(&users, "zzz").is_empty());
		assert!(matches(&users[1], "ONE"));
	}
}
