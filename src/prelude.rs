pub use crate::{
  bag::CancellationBag,
  current_value_subject::CurrentValueSubject,
  demand::Demand,
  error::EngineError,
  publisher::{
    boxed::{BoxIt, BoxedPublisher},
    fail::{fail, Fail},
    from_iter::{from_iter, IterPublisher},
    just::{just, Just},
    DynPublisher, Publisher,
  },
  subject::Subject,
  subscriber::{BoxedSubscriber, FnSubscriber, Subscriber, Terminal},
  subscription::{Subscription, SubscriptionLike},
};
