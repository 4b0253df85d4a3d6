use chrono::{DateTime, FixedOffset};
use fake::{faker::internet::en::FreeEmail, Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::user::User;

pub struct UserFactory<T: Clone> {
    modifier_one: fn(x: &User, ext: T) -> User,
    modifier_many: fn(x: &User, idx: usize, ext: T) -> User,
}

impl<T: Clone> Default for UserFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UserFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &User, ext: T) -> User) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &User, idx: usize, ext: T) -> User) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<User> {
        let data = UserDummy::new();
        let data = data.generate_one();
        let data = (self.modifier_one)(&data, ext);
        insert_user(db, &data).await?;
        Ok(data.clone())
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<User>> {
        let data = UserDummy::new();
        let data = data.generate_many(num);
        let mut result: Vec<User> = vec![];
        for (idx, item) in data.iter().enumerate() {
            result.push((self.modifier_many)(item, idx, ext.clone()));
        }
        let mut tx = db.begin().await?;
        for item in result.clone() {
            sqlx::query(
                r#"INSERT INTO public.user (id, email, user_name, password, is_active, created_date, updated_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
            )
            .bind(item.id)
            .bind(&item.email)
            .bind(&item.user_name)
            .bind(&item.password)
            .bind(item.is_active)
            .bind(item.created_date)
            .bind(item.updated_date)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert_user(db: &PgPool, user: &User) -> anyhow::Result<()> {
    sqlx::query(
        r#"INSERT INTO public.user (id, email, user_name, password, is_active, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.user_name)
    .bind(&user.password)
    .bind(user.is_active)
    .bind(user.created_date)
    .bind(user.updated_date)
    .execute(db)
    .await?;
    Ok(())
}

#[derive(Debug, Default, Deserialize, Dummy, Clone)]
struct UserDummy {
    pub id: Uuid,
    pub user_name: String,
    pub password: String,
    pub is_active: Option<bool>,
    pub created_date: Option<DateTime<FixedOffset>>,
    pub updated_date: Option<DateTime<FixedOffset>>,
}

impl UserDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> User {
        let dummy = Faker.fake::<UserDummy>();
        User {
            id: dummy.id,
            email: FreeEmail().fake(),
            user_name: dummy.user_name,
            password: dummy.password,
            is_active: dummy.is_active,
            created_date: dummy.created_date,
            updated_date: dummy.updated_date,
        }
    }

    pub fn generate_many(&self, num: u32) -> Vec<User> {
        let mut result: Vec<User> = vec![];
        for _ in 0..num {
            result.push(self.generate_one());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::{factory::user::UserFactory, model::user::User};

    #[sqlx::test]
    async fn test_generate_one(pool: PgPool) -> anyhow::Result<()> {
        // When
        let mut factory = UserFactory::new();
        factory.generate_one(&pool, ()).await?;

        // Expect
        let num_data: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM public.user"#)
            .fetch_one(&pool)
            .await?;
        assert_eq!(num_data.0, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_one_modified(pool: PgPool) -> anyhow::Result<()> {
        // When
        let mut factory = UserFactory::<Uuid>::new();
        factory.modified_one(|data, id| {
            let now = Local::now().fixed_offset();
            User {
                id,
                email: "dinner@local.test".to_string(),
                user_name: "test_user".to_string(),
                password: data.password.clone(),
                is_active: Some(true),
                created_date: Some(now),
                updated_date: Some(now),
            }
        });
        let id = Uuid::now_v7();
        factory.generate_one(&pool, id).await?;

        // Expect
        let res: (Uuid, String, String, Option<bool>) =
            sqlx::query_as(r#"SELECT id, email, user_name, is_active FROM public.user"#)
                .fetch_one(&pool)
                .await?;
        assert_eq!(res.0, id);
        assert_eq!(res.1, "dinner@local.test".to_string());
        assert_eq!(res.2, "test_user".to_string());
        assert_eq!(res.3, Some(true));
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_many(pool: PgPool) -> anyhow::Result<()> {
        // When
        let mut factory = UserFactory::new();
        factory.generate_many(&pool, 10, ()).await?;

        // Expect
        let num_data: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM public.user"#)
            .fetch_one(&pool)
            .await?;
        assert_eq!(num_data.0, 10);
        Ok(())
    }
}
